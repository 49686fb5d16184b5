use std::fs;
use std::path::PathBuf;

use squad_ingest::error::PipelineError;
use squad_ingest::html_tables::{extract_tables, select_primary_table};
use squad_ingest::parse::parse_squad_html;
use squad_ingest::table::{Cell, Table};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn table_of_shape(cols: usize, rows: usize) -> Table {
    let headers = (0..cols).map(|c| format!("c{c}")).collect();
    let data = (0..rows)
        .map(|r| (0..cols).map(|c| Cell::text(format!("{r}:{c}"))).collect())
        .collect();
    Table::from_rows(headers, data)
}

#[test]
fn selector_prefers_widest_then_longest() {
    let tables = vec![
        table_of_shape(3, 10),
        table_of_shape(8, 2),
        table_of_shape(8, 9),
    ];
    let (chosen, notes) = select_primary_table("doc", tables).expect("one table should win");
    assert_eq!(chosen.n_cols(), 8);
    assert_eq!(chosen.n_rows(), 9);
    assert_eq!(notes.len(), 1);
    assert!(notes[0].contains("8 columns x 9 rows"));
}

#[test]
fn selector_fails_on_zero_tables() {
    let err = select_primary_table("doc", Vec::new()).unwrap_err();
    assert!(matches!(err, PipelineError::EmptyDocument { .. }));
}

#[test]
fn extraction_finds_both_fixture_tables() {
    let html = read_fixture("squad_1.html");
    let tables = extract_tables(&html);
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].n_cols(), 2);
    assert_eq!(tables[1].n_cols(), 7);
    assert_eq!(tables[1].n_rows(), 3);
}

#[test]
fn table_without_rows_is_not_a_candidate() {
    let tables = extract_tables("<html><body><table></table><p>hi</p></body></html>");
    assert!(tables.is_empty());
}

#[test]
fn squad_document_cleans_end_to_end() {
    let html = read_fixture("squad_1.html");
    let parsed = parse_squad_html("squad_1", &html).expect("fixture should parse");
    let table = parsed.table;

    assert_eq!(
        table.column_names().collect::<Vec<_>>(),
        vec!["Player", "Position", "apps", "apps_sub", "Gls", "Ast", "Pas %", "Mins"]
    );

    let players = &table.column("Player").unwrap().cells;
    assert_eq!(players[0], Cell::text("John Smith"));
    assert_eq!(players[1], Cell::text("Jane Doe"));

    let apps = &table.column("apps").unwrap().cells;
    assert_eq!(apps[0], Cell::Number(26.0));
    assert_eq!(apps[1], Cell::Number(14.0));
    assert_eq!(apps[2], Cell::Missing);

    let subs = &table.column("apps_sub").unwrap().cells;
    assert_eq!(subs[0], Cell::Int(1));
    assert_eq!(subs[1], Cell::Int(0));
    assert_eq!(subs[2], Cell::Int(3));

    // Column-wide percent division, multi-line header collapsed.
    let passing = &table.column("Pas %").unwrap().cells;
    assert_eq!(passing[0], Cell::Number(0.84));
    assert_eq!(passing[1], Cell::Number(0.91));
    assert_eq!(passing[2], Cell::Missing);

    let mins = &table.column("Mins").unwrap().cells;
    assert_eq!(mins[0], Cell::Number(2340.0));

    // Ast has an explicit dash sentinel on the last row.
    let assists = &table.column("Ast").unwrap().cells;
    assert_eq!(assists[2], Cell::Missing);

    // Free-text position codes coerce to missing like any unparseable cell.
    let positions = &table.column("Position").unwrap().cells;
    assert!(positions.iter().all(Cell::is_missing));

    assert_eq!(parsed.notes.len(), 1);
    assert!(parsed.notes[0].contains("7 columns x 3 rows"));
}

#[test]
fn secondary_fixture_keeps_cleaned_name_column() {
    let html = read_fixture("squad_2.html");
    let parsed = parse_squad_html("squad_2", &html).expect("fixture should parse");
    let table = parsed.table;
    // The "Name" join key survives numeric coercion and loses the same UI
    // artifact the "Player" column does.
    let names = &table.column("Name").unwrap().cells;
    assert_eq!(names[0], Cell::text("Jane Doe"));
    assert_eq!(names[1], Cell::text("Marko Ilic"));

    let saves = &table.column("Sv %").unwrap().cells;
    assert_eq!(saves[0], Cell::Number(0.78));
    assert_eq!(saves[1], Cell::Missing);

    let apps = &table.column("apps").unwrap().cells;
    assert_eq!(apps[0], Cell::Number(14.0));
    assert_eq!(apps[1], Cell::Missing);
    let subs = &table.column("apps_sub").unwrap().cells;
    assert_eq!(subs[1], Cell::Int(2));
}

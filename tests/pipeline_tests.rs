//! End-to-end pipeline tests over fabricated source tables
//!
//! Exercises merge, enrichment join, and CSV serialization without any
//! network access.

use std::collections::HashMap;

use index_snapshot::constituents::find_symbol_table;
use index_snapshot::export::write_csv;
use index_snapshot::pipeline::{assemble_constituents, collect_symbols};
use tempfile::tempdir;

const INDEX_A: &str = r#"
    <html><body>
    <p>Some preamble.</p>
    <table class="wikitable sortable">
      <tr><th>Symbol</th><th>Security</th><th>GICS Sector</th></tr>
      <tr><td><a href="/wiki/AAA">AAA</a></td><td>Alpha Corp</td><td>Industrials</td></tr>
      <tr><td>BBB</td><td>Beta Inc</td><td>Utilities</td></tr>
    </table>
    </body></html>
"#;

const INDEX_B: &str = r#"
    <html><body>
    <table class="wikitable sortable">
      <tr><th>Symbol</th><th>Company</th><th>Sector</th></tr>
      <tr><td>CCC</td><td>Gamma LLC</td><td>Energy</td></tr>
    </table>
    </body></html>
"#;

#[test]
fn two_index_snapshot_writes_expected_rows() {
    let index_a = find_symbol_table(INDEX_A, "http://test/a").unwrap();
    let index_b = find_symbol_table(INDEX_B, "http://test/b").unwrap();
    let tables = [index_a, index_b];

    let symbols = collect_symbols(&tables);
    assert_eq!(symbols, vec!["AAA", "BBB", "CCC"]);

    let prices = HashMap::from([
        ("AAA".to_string(), Some(10.5)),
        ("BBB".to_string(), None),
        ("CCC".to_string(), Some(20.0)),
    ]);
    let yields = HashMap::from([
        ("AAA".to_string(), Some(1.23)),
        ("BBB".to_string(), Some(2.0)),
        ("CCC".to_string(), None),
    ]);

    let constituents = assemble_constituents(&tables, &prices, &yields);
    assert_eq!(constituents.len(), 3);

    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.csv");
    write_csv(&constituents, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Symbol,Name,Sector,Price,Dividend Yield",
            "AAA,Alpha Corp,Industrials,10.5,1.23",
            "BBB,Beta Inc,Utilities,,2",
            "CCC,Gamma LLC,Energy,20,",
        ]
    );
}

#[test]
fn name_candidates_resolve_per_table() {
    // Index A spells the name column "Security", index B "Company";
    // both resolve through the same candidate list.
    let index_a = find_symbol_table(INDEX_A, "http://test/a").unwrap();
    let index_b = find_symbol_table(INDEX_B, "http://test/b").unwrap();
    let tables = [index_a, index_b];

    let constituents = assemble_constituents(&tables, &HashMap::new(), &HashMap::new());
    assert_eq!(constituents[0].name, "Alpha Corp");
    assert_eq!(constituents[2].name, "Gamma LLC");
    assert_eq!(constituents[2].sector, "Energy");
}

#[test]
fn duplicate_symbols_across_indices_stay_duplicated() {
    let duplicated = r#"
        <table>
          <tr><th>Symbol</th><th>Security</th></tr>
          <tr><td>AAA</td><td>Alpha Corp</td></tr>
        </table>
    "#;
    let index_a = find_symbol_table(duplicated, "http://test/a").unwrap();
    let index_b = find_symbol_table(duplicated, "http://test/b").unwrap();
    let tables = [index_a, index_b];

    let prices = HashMap::from([("AAA".to_string(), Some(10.5))]);
    let constituents = assemble_constituents(&tables, &prices, &HashMap::new());

    assert_eq!(constituents.len(), 2);
    assert_eq!(constituents[0].symbol, "AAA");
    assert_eq!(constituents[1].symbol, "AAA");
    assert_eq!(constituents[0].price, constituents[1].price);
}

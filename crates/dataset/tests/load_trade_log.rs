use dataset::{DatasetError, load_csv, load_from_reader};
use rust_decimal_macros::dec;
use std::io::Write;

const HEADER: &str =
    "Number,Trade type,Exposure,Entry balance,Exit balance,Pnl (incl fees),Exchange,Margin,Entry time,BTC Price";

fn write_log(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    write!(file, "{body}").unwrap();
    file
}

#[test]
fn loads_rows_in_file_order() {
    let file = write_log(
        "2,Short,0.5,1100,1050,-50,Bitmex,1,2020-02-03 09:00:00,9500.5\n\
         1,Long,0.4,1000,1100,100,Bitmex,1,2020-01-02 09:00:00,9000\n",
    );

    let table = load_csv(file.path()).unwrap();

    assert_eq!(table.len(), 2);
    let first = &table.as_slice()[0];
    assert_eq!(first.number, Some(2));
    assert_eq!(first.trade_type, "Short");
    assert_eq!(first.exposure, Some(dec!(0.5)));
    assert_eq!(first.btc_price, dec!(9500.5));
    assert_eq!(first.pnl, dec!(-50));
    assert_eq!(table.as_slice()[1].number, Some(1));
}

#[test]
fn optional_columns_may_be_absent() {
    let csv = "Exchange,Margin,Entry time,Entry balance,Exit balance,Trade type,Pnl (incl fees),BTC Price\n\
               Binance,2.0,2020-01-02T09:00:00Z,1000,1010,Long,10,9000\n";

    let table = load_from_reader(csv.as_bytes()).unwrap();

    let trade = &table.as_slice()[0];
    assert_eq!(trade.number, None);
    assert_eq!(trade.exposure, None);
    assert_eq!(trade.leverage, 2);
}

#[test]
fn missing_required_columns_are_all_reported() {
    let csv = "Exchange,Margin,Entry time,Entry balance,Trade type\n\
               Bitmex,1,2020-01-02,1000,Long\n";

    let err = load_from_reader(csv.as_bytes()).unwrap_err();

    match err {
        DatasetError::MissingColumns(missing) => {
            assert_eq!(missing, vec!["Exit balance", "Pnl (incl fees)", "BTC Price"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_money_value_is_fatal() {
    let file = write_log("1,Long,0.4,abc,1100,100,Bitmex,1,2020-01-02 09:00:00,9000\n");

    let err = load_csv(file.path()).unwrap_err();

    assert!(matches!(err, DatasetError::Row { line: 2, .. }), "got {err:?}");
}

#[test]
fn fractional_margin_is_rejected() {
    let file = write_log("1,Long,0.4,1000,1100,100,Bitmex,1.5,2020-01-02 09:00:00,9000\n");

    assert!(matches!(load_csv(file.path()), Err(DatasetError::Row { .. })));
}

#[test]
fn unparseable_entry_time_is_fatal() {
    let file = write_log("1,Long,0.4,1000,1100,100,Bitmex,1,yesterday,9000\n");

    let err = load_csv(file.path()).unwrap_err();

    match err {
        DatasetError::EntryTime { line, value } => {
            assert_eq!(line, 2);
            assert_eq!(value, "yesterday");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_csv(dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, DatasetError::Io(_)));
}

#[test]
fn selector_helpers_follow_first_appearance() {
    let file = write_log(
        "1,Long,,1000,1100,100,Bitmex,5,2020-03-02 09:00:00,9000\n\
         2,Long,,1000,1100,100,Binance,1,2020-01-02 09:00:00,9000\n\
         3,Short,,1000,1100,100,Bitmex,1,2020-01-05 09:00:00,9000\n\
         4,Short,,1000,1100,100,Bitmex,5,2020-04-01 09:00:00,9000\n",
    );

    let table = load_csv(file.path()).unwrap();

    assert_eq!(table.exchanges(), vec!["Bitmex", "Binance"]);
    assert_eq!(table.leverages(), vec![5, 1]);

    let bitmex = table.date_bounds(Some("Bitmex")).unwrap();
    assert_eq!(bitmex.start.to_rfc3339(), "2020-01-05T09:00:00+00:00");
    assert_eq!(bitmex.end.to_rfc3339(), "2020-04-01T09:00:00+00:00");

    let all = table.date_bounds(None).unwrap();
    assert_eq!(all.start.to_rfc3339(), "2020-01-02T09:00:00+00:00");

    assert!(table.date_bounds(Some("Kraken")).is_none());
    assert!(!table.contains_exchange("Kraken"));
}

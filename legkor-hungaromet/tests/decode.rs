use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use legkor_hungaromet::decode::{decode_column, decode_recent, decompress};
use legkor_hungaromet::fold_ascii;

fn gz(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn decompress_roundtrips() {
    let payload = decompress(&gz("Time;tx\n20200101;5.0\n"), "hungaromet/historical").unwrap();
    assert_eq!(payload, b"Time;tx\n20200101;5.0\n");
}

#[test]
fn corrupt_archive_is_a_retryable_fetch_failure() {
    let err = decompress(b"definitely not gzip", "hungaromet/historical").unwrap_err();
    assert!(err.is_retryable());
    assert!(err.to_string().contains("hungaromet/historical"));
}

#[test]
fn column_feed_trims_headers_and_drops_extras() {
    let text = " Time ; tx ; EOR\n20200101; 5.0 ;x\n20200102;6.1;x\n";
    let column = decode_column(text.as_bytes(), "tx").unwrap();
    assert_eq!(
        column,
        vec![
            ("20200101".to_string(), Some("5.0".to_string())),
            ("20200102".to_string(), Some("6.1".to_string())),
        ]
    );
}

#[test]
fn sentinel_and_empty_cells_become_missing() {
    let text = "Time;ta\n20200101;-999\n20200102;\n20200103;3.2\n";
    let column = decode_column(text.as_bytes(), "ta").unwrap();
    assert_eq!(column[0].1, None);
    assert_eq!(column[1].1, None);
    assert_eq!(column[2].1, Some("3.2".to_string()));
}

#[test]
fn missing_value_column_is_a_data_error() {
    let err = decode_column(b"Time;tx\n20200101;5.0\n", "ta").unwrap_err();
    assert!(!err.is_retryable());
    assert!(err.to_string().contains("'ta'"));
}

#[test]
fn recent_feed_skips_preamble_and_selects_columns() {
    let text = "\
station metadata line 1
line 2
line 3
line 4
line 5
Time; r ; t ; tx ; tn ;EOR
20200101;0.0;2.5;5.0;-1.0;x
20200102;1.2;-999;6.0;0.0;x
";
    let rows = decode_recent(text.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "20200101");
    assert_eq!(rows[0].t_mean.as_deref(), Some("2.5"));
    assert_eq!(rows[0].t_max.as_deref(), Some("5.0"));
    assert_eq!(rows[0].t_min.as_deref(), Some("-1.0"));
    // Sentinel in the mean column of the second row.
    assert_eq!(rows[1].t_mean, None);
}

#[test]
fn truncated_preamble_is_a_data_error() {
    let err = decode_recent(b"only\ntwo lines\n").unwrap_err();
    assert!(err.to_string().contains("preamble"));
}

#[test]
fn fold_ascii_strips_diacritics_only() {
    assert_eq!(fold_ascii("Budapest"), "Budapest");
    assert_eq!(fold_ascii("Pécs"), "Pecs");
    assert_eq!(fold_ascii("Hódmezővásárhely"), "Hodmezovasarhely");
}

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use trend_engine::config::settings::{AnalyzerSettings, ChartStyle};
use trend_engine::report::{render_svg, render_table};
use trend_engine::{ErrorKind, TrendAnalyzer};

fn sample_csv() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data/sample_stock_data.csv")
}

#[test]
fn sample_file_end_to_end() {
    let settings = AnalyzerSettings::load_default().unwrap();
    let mut analyzer = TrendAnalyzer::new(&settings).unwrap();
    let report = analyzer.analyze_path(sample_csv()).unwrap();

    assert_eq!(report.symbol, "AAPL");
    assert_eq!(report.series.len(), 80);
    assert_eq!(report.series.columns, vec!["Date", "Open", "High", "Low", "Close", "Volume"]);

    let closes: Vec<f64> = report.series.closes().into_iter().flatten().collect();
    assert_eq!(closes.len(), 80);
    for (name, window) in [("SMA_20", 20usize), ("SMA_50", 50usize)] {
        let values = &report.series.indicator(name).unwrap().values;
        assert_eq!(values.len(), 80);
        for (i, value) in values.iter().enumerate() {
            if i + 1 < window {
                assert!(value.is_none(), "{} should be undefined at {}", name, i);
            } else {
                let expected = closes[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
                assert!((value.unwrap() - expected).abs() < 1e-9, "{} mismatch at {}", name, i);
            }
        }
    }

    let table = render_table(&report.series, Some(10));
    assert!(table.contains("SMA_50"));
    assert!(table.contains("Volume"));

    let svg = render_svg(&report.symbol, &report.series, &ChartStyle::default());
    assert_eq!(svg.matches("<polyline").count(), 3);
}

#[test]
fn missing_columns_and_files_surface_single_messages() {
    let mut analyzer = TrendAnalyzer::new(&AnalyzerSettings::default()).unwrap();

    let err = analyzer.analyze_path("data/nope.csv").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
    assert_eq!(err.user_message(), "File not found. Please check the file path.");

    let mut no_date = NamedTempFile::new().unwrap();
    writeln!(no_date, "Day,Close\n2024-01-02,1.0").unwrap();
    let err = analyzer.analyze_path(no_date.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingColumn);
    assert_eq!(err.user_message(), "Error: CSV file must contain a 'Date' column.");

    let mut bad_date = NamedTempFile::new().unwrap();
    writeln!(bad_date, "Date,Close\n2024-01-02,1.0\nsoon,2.0").unwrap();
    let err = analyzer.analyze_path(bad_date.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DateParse);
}

#[test]
fn upload_with_semicolons_and_header_only() {
    let settings = AnalyzerSettings {
        csv_delimiter: ";".to_string(),
        ..AnalyzerSettings::default()
    };
    let mut analyzer = TrendAnalyzer::new(&settings).unwrap();

    let report = analyzer.analyze_upload("empty.csv", b"Date;Close\n").unwrap();
    assert!(report.series.is_empty());
    assert_eq!(report.series.indicators.len(), 2);

    let report = analyzer
        .analyze_upload("two.csv", b"Date;Close;Note\n2024-01-02;1.5;a\n2024-01-03;2.5;b\n")
        .unwrap();
    assert_eq!(report.series.len(), 2);
    assert_eq!(report.series.rows[1].fields[2], "b");
    assert_eq!(analyzer.cache().len(), 2);
}

#[test]
fn upload_with_gaps_and_reupload_under_same_name() {
    let settings = AnalyzerSettings {
        sma_windows: vec![2],
        ..AnalyzerSettings::default()
    };
    let mut analyzer = TrendAnalyzer::new(&settings).unwrap();

    let report = analyzer
        .analyze_upload("prices.csv", b"Date,Close\n2024-01-02,\n2024-01-02,NA\n,2\n")
        .unwrap();
    assert_eq!(report.series.len(), 3);
    assert_eq!(report.series.indicator("SMA_2").unwrap().values, vec![None, None, None]);

    let report = analyzer
        .analyze_upload("prices.csv", b"Date,Close\n2024-01-02,1\n2024-01-03,3\n")
        .unwrap();
    assert_eq!(report.series.indicator("SMA_2").unwrap().values, vec![None, Some(2.0)]);
    assert_eq!(analyzer.cache().len(), 1);
}

//! Runs the CLI entry point against documents on disk.

use std::fs;
use std::path::PathBuf;

use farmacia_price_check::{run, AppError};

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("farmacia-price-check-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn quotes_document_from_disk() {
    let product = scratch_file(
        "paracetamol.json",
        r#"{ "nombre": "Paracetamol 500mg", "categoria": "Medicamentos", "precio": 100,
             "descuentoINAPAM": true, "promosPorDia": { "lunes": { "porcentaje": 10 } } }"#,
    );
    let config = scratch_file("pricing.toml", "[output]\npretty = false\n");

    let out = run(args(&[
        "--product", product.to_str().unwrap(),
        "--config", config.to_str().unwrap(),
        "--at", "2025-03-03T12:00:00-06:00",
        "--inapam",
        "--qty", "3",
    ]))
    .unwrap();

    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["weekday"], 1);
    assert_eq!(report["line"]["appliedPromotion"], "Lunes-INAPAM");
    assert_eq!(report["line"]["discountDisplay"], "10% + 5%");
    assert_eq!(report["line"]["unitPrice"], 8550);
    assert_eq!(report["line"]["lineTotal"], 25650);
}

#[test]
fn rejects_bad_config() {
    let product = scratch_file("gasas.json", r#"{ "precio": 20 }"#);
    let config = scratch_file("bad.toml", "[pricing]\ninapam_factor = 3.0\n");

    let result = run(args(&[
        "--product", product.to_str().unwrap(),
        "--config", config.to_str().unwrap(),
    ]));
    assert!(matches!(result, Err(AppError::InvalidConfig(_))));
}

#[test]
fn missing_product_file_is_an_io_error() {
    let config = scratch_file("empty.toml", "");
    let result = run(args(&[
        "--product", "/definitely/not/here.json",
        "--config", config.to_str().unwrap(),
    ]));
    assert!(matches!(result, Err(AppError::Io(_))));
}

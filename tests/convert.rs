use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use taxsheets::{
    worksheet_path, ConceptConverter, Error, PresentationConverter, PresentationRecord,
    WorksheetKind,
};

const RAW_CONCEPTS: &str = "\u{feff}Namespace,Name,Period Type,Balance,Abstract,Label,Documentation\n\
http://fasb.org/us-gaap/2024,Assets,instant,debit,false,Assets,Total assets\n\
http://xbrl.sec.gov/dei/2024,EntityRegistrantName,duration,,false,Entity Registrant Name,\"Name, as registered\"\n\
,us-gaap:Liabilities,instant,credit,false,Liabilities,\"Sum of \"\"all\"\" liabilities\"\n\
,ifrs-full:Revenue,duration,credit,false,Revenue,\n";

const RAW_PRESENTATION: &str = "\u{feff}Role,Level 1,Level 2,Level 3,Pref. Label,Name,Type\n\
Statement of Financial Position\n\
,Assets,,,Assets,us-gaap:Assets,monetary\n\
,,Cash,,Cash,us-gaap:CashAndCashEquivalents,monetary\n\
,,Receivables,,Receivables,us-gaap:AccountsReceivable,monetary\n\
,,,Allowance,Allowance,us-gaap:Allowance,monetary\n\
,Liabilities,,,Liabilities,us-gaap:Liabilities,monetary\n\
,,Payables,,Payables,us-gaap:AccountsPayable,monetary\n\
\n\
Statement of Operations\n\
,Revenues,,,Revenues,us-gaap:Revenues\n\
,,Product,,Product,Product\n";

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn read_presentation(path: &Path) -> Vec<PresentationRecord> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .map(|row| {
            let row = row.unwrap();
            PresentationRecord {
                prefix: row[0].into(),
                name: row[1].into(),
                depth: row[2].parse().unwrap(),
                order: row[3].parse().unwrap(),
                parent: row[4].to_string(),
                role_name: row[5].to_string(),
            }
        })
        .collect()
}

#[test]
fn concepts_worksheet_written_to_nested_dir() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write(dir.path(), "raw_concepts.csv", RAW_CONCEPTS);
    let out = worksheet_path(dir.path().join("out").join("2024"), WorksheetKind::Concepts, 2024);

    let stats = ConceptConverter::new().convert_file(&raw, &out).unwrap();

    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "prefix,periodType,balance,abstract,name,label,documentation\r\n\
         us-gaap,instant,debit,false,Assets,Assets,Total assets\r\n\
         us-gaap,instant,credit,false,Liabilities,Liabilities,\"Sum of \"\"all\"\" liabilities\"\r\n"
    );
    assert_eq!(stats.rows_read, 4);
    assert_eq!(stats.records_written, 2);
}

#[test]
fn concepts_conversion_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write(dir.path(), "raw.csv", RAW_CONCEPTS);
    let out = dir.path().join("concepts.csv");

    ConceptConverter::new().convert_file(&raw, &out).unwrap();
    let first = fs::read(&out).unwrap();
    ConceptConverter::new().convert_file(&raw, &out).unwrap();
    let second = fs::read(&out).unwrap();

    assert_eq!(first, second);
    assert!(!first.starts_with(b"\xEF\xBB\xBF"));
}

#[test]
fn concepts_missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let err = ConceptConverter::new()
        .convert_file(dir.path().join("nope.csv"), &out)
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(!out.exists());
}

#[test]
fn presentation_worksheet_rebuilds_hierarchy() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write(dir.path(), "raw_pre.csv", RAW_PRESENTATION);
    let out = worksheet_path(dir.path(), WorksheetKind::Presentation, 2024);

    let stats = PresentationConverter::new().convert_file(&raw, &out).unwrap();
    let records = read_presentation(&out);

    let sfp = "Statement of Financial Position";
    let ops = "Statement of Operations";
    let rows: Vec<(&str, usize, u32, &str, &str)> = records
        .iter()
        .map(|r| {
            (
                r.name.as_str(),
                r.depth,
                r.order,
                r.parent.as_str(),
                r.role_name.as_str(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Assets", 1, 1, "", sfp),
            ("CashAndCashEquivalents", 2, 1, "us-gaap:Assets", sfp),
            ("AccountsReceivable", 2, 2, "us-gaap:Assets", sfp),
            ("Allowance", 3, 1, "us-gaap:AccountsReceivable", sfp),
            ("Liabilities", 1, 2, "", sfp),
            ("AccountsPayable", 2, 1, "us-gaap:Liabilities", sfp),
            ("Revenues", 1, 1, "", ops),
            ("Product", 2, 1, "us-gaap:Revenues", ops),
        ]
    );
    assert_eq!(records[7].prefix, "");
    assert_eq!(stats.roles, 2);
    assert_eq!(stats.records_written, 8);
}

#[test]
fn presentation_orders_are_contiguous_per_parent() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write(dir.path(), "raw_pre.csv", RAW_PRESENTATION);
    let records = PresentationConverter::new()
        .records(fs::File::open(&raw).unwrap())
        .unwrap();

    let mut seen: HashMap<(String, usize, String), u32> = HashMap::new();
    for record in &records {
        let key = (record.role_name.clone(), record.depth, record.parent.clone());
        let last = seen.entry(key).or_insert(0);
        assert_eq!(record.order, *last + 1, "{:?}", record);
        *last = record.order;

        if record.depth == 1 {
            assert_eq!(record.parent, "");
        }
    }
}

#[test]
fn presentation_missing_columns_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out").join("presentation.csv");

    let raw = write(dir.path(), "no_label.csv", "Role,L1,Name\nRole\n,a,us-gaap:A\n");
    let err = PresentationConverter::new().convert_file(&raw, &out).unwrap_err();
    assert_eq!(err.to_string(), "Missing 'Pref. Label' column in raw CSV.");
    assert!(!out.exists());

    let raw = write(dir.path(), "no_name.csv", "Role,L1,Pref. Label,LocalName\n");
    let err = PresentationConverter::new().convert_file(&raw, &out).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing 'Name' column (use --relationshipCols=Name,LocalName)."
    );
    assert!(!out.exists());
}

//! Integration tests for carevis-common crate.

use carevis_common::test_utils::{
    init_test_logging, records_to_csv, sample_records, visit, write_temp_csv,
};
use carevis_common::{
    format_count, truncate_label, CarevisError, ClinicDirectory, DatasetLoader, FamilyNumber,
};

#[tokio::test]
async fn test_load_dataset_from_disk() {
    init_test_logging();
    let file = write_temp_csv(&records_to_csv(&sample_records()));

    let (dataset, report) = DatasetLoader::new(file.path()).load().await.unwrap();

    assert_eq!(dataset.len(), sample_records().len());
    assert_eq!(report.rows, dataset.len());
    assert_eq!(report.coerced_cells(), 0);
    assert_eq!(dataset.distinct_services(), vec!["Dental", "General Medicine", "Pediatrics"]);
}

#[tokio::test]
async fn test_load_reports_coerced_cells() {
    let file = write_temp_csv(
        "PServdate,ServName,patsex,PatAge,nationality,FamilyNbr,cntname\n\
         2023-02-30,Dental,F,n/a,Lebanese,three,Tyre\n\
         2023-02-01,Dental,M,41,Syrian,3.0,Tyre\n",
    );

    let (dataset, report) = DatasetLoader::new(file.path()).load().await.unwrap();

    assert_eq!(report.unparseable_dates, 1);
    assert_eq!(report.invalid_ages, 1);
    assert_eq!(report.invalid_family_numbers, 1);
    assert_eq!(dataset.records()[1].family_number, Some(FamilyNumber(3)));
}

#[tokio::test]
async fn test_missing_column_is_fatal_data_error() {
    let file = write_temp_csv("PServdate,ServName\n2023-01-01,Dental\n");

    let error = DatasetLoader::new(file.path()).load().await.unwrap_err();

    assert!(matches!(error, CarevisError::Data { .. }));
    assert!(error.is_fatal());
}

#[test]
fn test_fixture_builder_leaves_unset_fields_missing() {
    let record = visit().service("Dental").build();
    assert_eq!(record.service(), Some("Dental"));
    assert!(record.service_date.is_none());
    assert!(record.family_number.is_none());
}

#[test]
fn test_sample_records_use_known_clinics() {
    let directory = ClinicDirectory::south_lebanon();
    assert!(sample_records()
        .iter()
        .filter_map(|record| record.clinic())
        .all(|clinic| directory.contains(clinic)));
}

#[test]
fn test_formatting_helpers() {
    assert_eq!(format_count(12_345), "12,345");
    assert_eq!(truncate_label("Ophthalmology Outpatient", 12), "Ophthalmo...");
}

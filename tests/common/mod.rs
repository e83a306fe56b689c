//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use lotview::pipeline::{clean, OdometerRange, RawTable, Table, Vehicle, ModelYear, UNKNOWN};
use tempfile::TempDir;

/// Header of the listings file, including the two passthrough columns
pub const HEADER: &str =
    "price,model_year,model,condition,cylinders,fuel,odometer,transmission,type,paint_color,is_4wd,date_posted,days_listed";

/// A small listings file with known characteristics:
/// - row 3 duplicates row 1
/// - row 4 is priced below the floor, row 5 above the ceiling
/// - row 6 has an odometer over the limit
/// - row 7 has blank model_year, odometer, cylinders, paint_color and is_4wd
/// - row 8 has an unreadable cylinders value
pub fn sample_rows() -> Vec<&'static str> {
    vec![
        "9400,2011,bmw x5,good,6,gas,145000,automatic,SUV,,1,2018-06-23,19",
        "25500,,ford f-150,good,6,gas,88705,automatic,pickup,white,1,2018-10-19,50",
        "5500,2013,hyundai sonata,like new,4,gas,110000,automatic,sedan,red,,2019-02-07,79",
        "25500,,ford f-150,good,6,gas,88705,automatic,pickup,white,1,2018-10-19,50",
        "300,2003,ford f-150,fair,8,gas,161397,automatic,pickup,black,,2019-03-22,9",
        "150000,2018,chevrolet silverado,new,8,diesel,5000,automatic,truck,black,1,2018-06-20,15",
        "14900,2017,chrysler 200,excellent,4,gas,600000,automatic,sedan,black,,2019-01-07,68",
        "14990,,chrysler 300,excellent,,gas,,automatic,sedan,,,2018-06-29,73",
        "12990,2015,toyota camry,excellent,six,gas,79212,automatic,sedan,white,,2018-12-27,73",
        "8990,2012,honda pilot,excellent,6,gas,109473,automatic,SUV,black,1,2019-01-07,68",
    ]
}

/// Write `rows` under the standard header into a temporary CSV file
pub fn create_temp_listings(rows: &[&str]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("vehicles.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    drop(file);

    (temp_dir, csv_path)
}

/// Temporary CSV with the sample rows
pub fn create_sample_listings() -> (TempDir, PathBuf) {
    create_temp_listings(&sample_rows())
}

/// Build a raw table straight from header and row strings
pub fn raw_from_rows(header: &str, rows: &[&str]) -> RawTable {
    let headers: Vec<String> = header.split(',').map(str::to_string).collect();
    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(rows.len()); headers.len()];
    for row in rows {
        for (i, cell) in row.split(',').enumerate() {
            columns[i].push(if cell.is_empty() { None } else { Some(cell.to_string()) });
        }
    }
    RawTable::new(headers, columns)
}

/// Clean rows given under the standard header
pub fn clean_rows(rows: &[&str]) -> Table {
    clean(&raw_from_rows(HEADER, rows)).unwrap().table
}

/// A vehicle with sensible defaults, for building tables by hand
pub fn vehicle(manufacturer: &str, vehicle_type: &str, price: f64, odometer: f64) -> Vehicle {
    Vehicle {
        price,
        model_year: ModelYear::Year(2015),
        model: Some(format!("{} model", manufacturer)),
        condition: Some("good".to_string()),
        cylinders: Some(6.0),
        odometer,
        transmission: Some("automatic".to_string()),
        vehicle_type: Some(vehicle_type.to_string()),
        paint_color: UNKNOWN.to_string(),
        is_4wd: false,
        days_listed: Some(30),
        manufacturer: Some(manufacturer.to_string()),
        odometer_range: OdometerRange::from_odometer(odometer),
        extras: Vec::new(),
    }
}

/// Table over hand-built vehicles with no passthrough columns
pub fn table_of(vehicles: Vec<Vehicle>) -> Table {
    Table::new(vehicles, Vec::new())
}

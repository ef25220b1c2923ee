//! Small on-disk SQLite fixtures for tests.

use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub fn zips_db(dir: &Path) -> PathBuf {
    let path = dir.join("zips.sqlite3");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE ZIPCodes_Primary (
            ZipCode TEXT PRIMARY KEY,
            CityMixedCase TEXT,
            State TEXT,
            County TEXT,
            Latitude REAL,
            Longitude REAL,
            TimeZone INTEGER,
            DayLightSaving TEXT,
            Population INTEGER
         );
         INSERT INTO ZIPCodes_Primary VALUES
            ('02138', 'Cambridge', 'MA', 'MIDDLESEX', 42.377, -71.1256, 5, 'Y', 36314),
            ('90210', 'Beverly Hills', 'CA', 'LOS ANGELES', 34.0901, -118.4065, 8, 'Y', 21741),
            ('85001', 'Phoenix', 'AZ', 'MARICOPA', 33.4484, -112.074, '7', 'N', 0),
            ('99501', 'Anchorage', 'AK', 'ANCHORAGE', 61.2167, -149.8761, 9, 'Y', 17213),
            ('00000', 'Nowhere', 'XX', NULL, 0, 0, 5, 'Y', 0),
            ('00001', 'Limbo', 'XX', NULL, NULL, NULL, 5, 'Y', 0);",
    )
    .unwrap();
    path
}

pub fn geonames_db(dir: &Path) -> PathBuf {
    let path = dir.join("geonames.sqlite3");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE geoname (
            geonameid INTEGER PRIMARY KEY,
            name TEXT,
            asciiname TEXT,
            country TEXT,
            admin1 TEXT,
            latitude REAL,
            longitude REAL,
            population INTEGER,
            timezone TEXT
         );
         CREATE TABLE country (iso TEXT PRIMARY KEY, country TEXT);
         CREATE TABLE admin1 (key TEXT PRIMARY KEY, name TEXT, asciiname TEXT);
         INSERT INTO country VALUES
            ('US', 'United States'),
            ('IL', 'Israel'),
            ('FR', 'France');
         INSERT INTO admin1 VALUES
            ('US.NY', 'New York', 'New York'),
            ('IL.06', 'Jerusalem District', 'Jerusalem District'),
            ('IL.05', 'Tel Aviv District', 'Tel Aviv District'),
            ('FR.11', 'Île-de-France', 'Ile-de-France');
         INSERT INTO geoname VALUES
            (5128581, 'New York City', 'New York City', 'US', 'NY', 40.71427, -74.00597, 8175133, 'America/New_York'),
            (281184, 'Jerualem', 'Jerualem', 'IL', '06', 31.76904, 35.21633, 801000, 'Asia/Jerusalem'),
            (281185, 'Jerusalem', 'Jerusalem', 'IL', '06', 31.76904, 35.21633, 801000, 'Asia/Jerusalem'),
            (293397, 'Tel Aviv', 'Tel Aviv', 'IL', '05', 32.08088, 34.78057, 432892, 'Asia/Jerusalem'),
            (2988507, 'Paris', 'Paris', 'FR', '11', 48.85341, 2.3488, 2138551, 'Europe/Paris'),
            (9999001, 'Nowhere Town', NULL, 'ZZ', '99', 10.5, 20.5, 0, 'UTC');",
    )
    .unwrap();
    path
}

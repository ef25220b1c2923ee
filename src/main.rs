use clap::{Parser, Subcommand};
use geo_lookup::location::{Location, LocationError, LocationResolver};
use geo_lookup::ResolverConfig;
use std::path::PathBuf;

/// geolookup: resolve a ZIP code, GeoNames id or legacy city name
///
/// Prints the resolved location as JSON on stdout.
///
/// Examples:
///   geolookup zip 02138
///   geolookup geoname 281184
///   geolookup city "New+York"
///   geolookup --data-dir /srv/geo zip 90210
#[derive(Parser)]
#[command(name = "geolookup", version, about, long_about = None)]
struct Cli {
    /// Directory holding zips.sqlite3, geonames.sqlite3 and legacy-cities.json.
    /// Defaults to ~/.geolookup
    #[arg(long, env = "GEOLOOKUP_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// ZIP code database (overrides --data-dir).
    #[arg(long, env = "GEOLOOKUP_ZIPS_DB")]
    zips_db: Option<PathBuf>,

    /// GeoNames database (overrides --data-dir).
    #[arg(long, env = "GEOLOOKUP_GEONAMES_DB")]
    geonames_db: Option<PathBuf>,

    /// Legacy city alias snapshot (overrides --data-dir).
    #[arg(long, env = "GEOLOOKUP_LEGACY_CITIES")]
    legacy_cities: Option<PathBuf>,

    /// Print a one-line summary to stderr as well.
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    lookup: Lookup,
}

#[derive(Subcommand)]
enum Lookup {
    /// Look up a 5-digit US ZIP code.
    Zip { code: String },
    /// Look up a GeoNames id.
    Geoname { id: u32 },
    /// Look up a legacy city name ("+" is read as a space).
    City { name: String },
}

impl Cli {
    fn config(&self) -> ResolverConfig {
        let mut config = match &self.data_dir {
            Some(dir) => ResolverConfig::from_dir(dir),
            None => ResolverConfig::default(),
        };
        if let Some(path) = &self.zips_db {
            config.zips_db = path.clone();
        }
        if let Some(path) = &self.geonames_db {
            config.geonames_db = path.clone();
        }
        if let Some(path) = &self.legacy_cities {
            config.legacy_cities = path.clone();
        }
        // one-shot process, nothing to reuse
        config.cache_capacity = 0;
        config
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let resolver = LocationResolver::open(&cli.config()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let result = run(&resolver, &cli.lookup);
    if let Err(e) = resolver.close() {
        eprintln!("Warning: {}", e);
    }

    match result {
        Ok(loc) => {
            if cli.verbose {
                eprintln!("  {}", loc.display_line());
            }
            match serde_json::to_string_pretty(&loc) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(resolver: &LocationResolver, lookup: &Lookup) -> Result<Location, LocationError> {
    match lookup {
        Lookup::Zip { code } => resolver.lookup_zip(code),
        Lookup::Geoname { id } => resolver.lookup_geoname(*id),
        Lookup::City { name } => resolver.lookup_legacy_city(name),
    }
}

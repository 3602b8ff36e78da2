use std::error::Error;
use std::io;
use std::process;

use zoneparser::EntryKind;

pub fn main() {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters("zoneparser=debug");
    builder.init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: zonecat <zone file>");
            process::exit(2);
        }
    };

    let zone = match zoneparser::parse(&path) {
        Ok(zone) => zone,
        Err(err) => {
            eprintln!("{}", err);
            let mut cause = err.source();
            while let Some(inner) = cause {
                eprintln!("  caused by: {}", inner);
                cause = inner.source();
            }
            process::exit(1);
        }
    };

    eprintln!(
        "{}: origin {} ttl {}, {} entries",
        path,
        zone.metadata.origin,
        zone.metadata.ttl,
        zone.len()
    );
    for entry in &zone {
        let what = match entry.kind {
            EntryKind::Record(ref host) => {
                format!("host {} ({} records)", host.hostname, host.records.len())
            }
            EntryKind::Generate(ref g) => format!("$GENERATE {} {} {}", g.range, g.owner, g.rtype),
            EntryKind::Ttl(ref ttl) => format!("$TTL {}", ttl.value),
            EntryKind::Origin(ref origin) => format!("$ORIGIN {}", origin.domain),
            EntryKind::Include(ref include) => format!("$INCLUDE {}", include.path.display()),
        };
        eprintln!("  {}: {}", entry.source_file.display(), what);
    }

    let stdout = io::stdout();
    if let Err(err) = zone.write_to(&mut stdout.lock()) {
        eprintln!("write failed: {}", err);
        process::exit(1);
    }
}

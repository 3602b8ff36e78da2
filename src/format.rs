use std::io;

use crate::name::relative_to;
use crate::structs::{EntryKind, GenerateDirective, HostRecord, Zone};

/// Quotes text unless it already carries its own quoted segments
fn quoted(text: &str) -> String {
    if text.contains('"') {
        text.to_owned()
    } else {
        format!("\"{}\"", text)
    }
}

impl HostRecord {
    /// Writes the host's records as zone file lines relative to `origin`
    ///
    /// Records come out grouped by type: SOA, NS, A, AAAA, CNAME, MX, TXT,
    /// PTR, SRV, CAA, HINFO, NAPTR, SPF. A blank line follows a host that
    /// has any records.
    pub fn write_to<T: io::Write>(&self, writer: &mut T, origin: &str) -> io::Result<()> {
        let owner = relative_to(&self.hostname, origin);
        let records = &self.records;

        for soa in &records.soa {
            writeln!(
                writer,
                "{}\t{}\tSOA\t{} {} (",
                owner, soa.rr.class, soa.primary_ns, soa.email
            )?;
            writeln!(writer, "\t\t\t\t\t{}\t; Serial", soa.serial)?;
            writeln!(writer, "\t\t\t\t\t{}\t; Refresh", soa.refresh)?;
            writeln!(writer, "\t\t\t\t\t{}\t; Retry", soa.retry)?;
            writeln!(writer, "\t\t\t\t\t{}\t; Expire", soa.expire)?;
            writeln!(writer, "\t\t\t\t\t{} )\t; Minimum TTL", soa.minimum_ttl)?;
        }
        for ns in &records.ns {
            writeln!(writer, "{}\t{}\tNS\t{}", owner, ns.rr.class, ns.name_server)?;
        }
        for a in &records.a {
            let comment = if a.inaddr { "\t; inaddr" } else { "" };
            writeln!(writer, "{}\t{}\tA\t{}{}", owner, a.rr.class, a.address, comment)?;
        }
        for aaaa in &records.aaaa {
            writeln!(writer, "{}\t{}\tAAAA\t{}", owner, aaaa.rr.class, aaaa.address)?;
        }
        for cname in &records.cname {
            writeln!(writer, "{}\t{}\tCNAME\t{}", owner, cname.rr.class, cname.target)?;
        }
        for mx in &records.mx {
            writeln!(
                writer,
                "{}\t{}\tMX\t{} {}",
                owner, mx.rr.class, mx.priority, mx.mail
            )?;
        }
        for txt in &records.txt {
            writeln!(writer, "{}\t{}\tTXT\t{}", owner, txt.rr.class, quoted(&txt.text))?;
        }
        for ptr in &records.ptr {
            writeln!(writer, "{}\t{}\tPTR\t{}", owner, ptr.rr.class, ptr.pointer)?;
        }
        for srv in &records.srv {
            writeln!(
                writer,
                "{}\t{}\tSRV\t{} {} {} {}",
                owner, srv.rr.class, srv.priority, srv.weight, srv.port, srv.target
            )?;
        }
        for caa in &records.caa {
            writeln!(
                writer,
                "{}\t{}\tCAA\t{} {} \"{}\"",
                owner, caa.rr.class, caa.flags, caa.tag, caa.value
            )?;
        }
        for hinfo in &records.hinfo {
            writeln!(
                writer,
                "{}\t{}\tHINFO\t\"{}\" \"{}\"",
                owner, hinfo.rr.class, hinfo.cpu, hinfo.os
            )?;
        }
        for naptr in &records.naptr {
            writeln!(
                writer,
                "{}\t{}\tNAPTR\t{} {} \"{}\" \"{}\" \"{}\" {}",
                owner,
                naptr.rr.class,
                naptr.order,
                naptr.preference,
                naptr.flags,
                naptr.service,
                naptr.regexp,
                naptr.replacement
            )?;
        }
        for spf in &records.spf {
            writeln!(writer, "{}\t{}\tSPF\t{}", owner, spf.rr.class, quoted(&spf.text))?;
        }

        if !records.is_empty() {
            writeln!(writer)?;
        }
        Ok(())
    }
}

impl GenerateDirective {
    pub fn write_to<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        writeln!(
            writer,
            "$GENERATE {} {} {} {} \"{}\"",
            self.range, self.owner, self.class, self.rtype, self.rdata
        )
    }
}

impl Zone {
    /// Writes the zone back out as zone file text
    ///
    /// `$ORIGIN` and `$TTL` come from the metadata first. Later directive
    /// entries are written only when they change the value in force, and each
    /// host is written relative to the origin in force at its position.
    /// Included files are written inline after a `; $INCLUDE` comment, so
    /// the output stands on its own.
    pub fn write_to<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        let mut origin = self.metadata.origin.as_str();
        let mut ttl = self.metadata.ttl;
        writeln!(writer, "$ORIGIN {}", origin)?;
        writeln!(writer, "$TTL {}", ttl)?;
        writeln!(writer)?;

        for entry in self {
            match entry.kind {
                EntryKind::Record(ref host) => host.write_to(writer, origin)?,
                EntryKind::Ttl(ref directive) => {
                    if directive.value != ttl {
                        ttl = directive.value;
                        writeln!(writer, "$TTL {}", ttl)?;
                    }
                }
                EntryKind::Origin(ref directive) => {
                    if directive.domain != origin {
                        origin = directive.domain.as_str();
                        writeln!(writer, "$ORIGIN {}", origin)?;
                    }
                }
                EntryKind::Include(ref include) => {
                    writeln!(writer, "; $INCLUDE {}", include.filename)?
                }
                EntryKind::Generate(ref generate) => generate.write_to(writer)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::structs::*;
    use std::collections::HashMap;
    use std::net::Ipv4Addr;
    use std::path::PathBuf;

    fn rr() -> ResourceRecord {
        ResourceRecord::new(3600, "IN")
    }

    fn render(host: &HostRecord) -> String {
        let mut out = Vec::new();
        host.write_to(&mut out, "example.com.").unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_host_writes_nothing() {
        assert_eq!(render(&HostRecord::new("www.example.com.")), "");
    }

    #[test]
    fn a_records() {
        let mut host = HostRecord::new("www.example.com.");
        host.records.a.push(ARecord {
            rr: rr(),
            address: Ipv4Addr::new(192, 168, 1, 1),
            inaddr: false,
        });
        assert_eq!(render(&host), "www\tIN\tA\t192.168.1.1\n\n");

        host.records.a[0].inaddr = true;
        assert_eq!(render(&host), "www\tIN\tA\t192.168.1.1\t; inaddr\n\n");
    }

    #[test]
    fn mx_and_txt_at_origin() {
        let mut host = HostRecord::new("example.com.");
        host.records.txt.push(TxtRecord {
            rr: rr(),
            text: "v=spf1 include:_spf.google.com ~all".into(),
        });
        host.records.mx.push(MxRecord {
            rr: rr(),
            priority: 10,
            mail: "mail.example.com.".into(),
        });
        assert_eq!(
            render(&host),
            "@\tIN\tMX\t10 mail.example.com.\n\
             @\tIN\tTXT\t\"v=spf1 include:_spf.google.com ~all\"\n\n"
        );
    }

    #[test]
    fn multi_segment_txt_is_not_requoted() {
        let mut host = HostRecord::new("t.example.com.");
        host.records.txt.push(TxtRecord {
            rr: rr(),
            text: "\"a\" \"b\"".into(),
        });
        assert_eq!(render(&host), "t\tIN\tTXT\t\"a\" \"b\"\n\n");
    }

    #[test]
    fn soa_block() {
        let mut host = HostRecord::new("example.com.");
        host.records.soa.push(SoaRecord {
            rr: ResourceRecord::new(86400, "IN"),
            primary_ns: "ns1.example.com.".into(),
            email: "admin.example.com.".into(),
            serial: 2023010101,
            refresh: 3600,
            retry: 1800,
            expire: 604800,
            minimum_ttl: 86400,
        });
        let out = render(&host);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "@\tIN\tSOA\tns1.example.com. admin.example.com. (");
        assert_eq!(lines[1], "\t\t\t\t\t2023010101\t; Serial");
        assert_eq!(lines[5], "\t\t\t\t\t86400 )\t; Minimum TTL");
    }

    #[test]
    fn srv_and_caa() {
        let mut host = HostRecord::new("_sip._tcp.example.com.");
        host.records.srv.push(SrvRecord {
            rr: rr(),
            priority: 10,
            weight: 60,
            port: 5060,
            target: "sip.example.com.".into(),
        });
        host.records.caa.push(CaaRecord {
            rr: rr(),
            flags: 0,
            tag: "issue".into(),
            value: "letsencrypt.org".into(),
        });
        assert_eq!(
            render(&host),
            "_sip._tcp\tIN\tSRV\t10 60 5060 sip.example.com.\n\
             _sip._tcp\tIN\tCAA\t0 issue \"letsencrypt.org\"\n\n"
        );
    }

    fn entry(kind: EntryKind) -> ZoneEntry {
        ZoneEntry {
            kind,
            raw_line: String::new(),
            source_file: PathBuf::from("db.example"),
        }
    }

    fn host_with_a(hostname: &str, ttl: u32) -> HostRecord {
        let mut host = HostRecord::new(hostname);
        host.records.a.push(ARecord {
            rr: ResourceRecord::new(ttl, "IN"),
            address: Ipv4Addr::new(10, 0, 0, 1),
            inaddr: false,
        });
        host
    }

    fn origin(domain: &str) -> EntryKind {
        EntryKind::Origin(OriginDirective {
            domain: domain.into(),
        })
    }

    #[test]
    fn zone_output_skips_repeated_directives() {
        let mut www = HostRecord::new("www.example.com.");
        www.records.cname.push(CnameRecord {
            rr: rr(),
            target: "example.com.".into(),
        });
        let entries = vec![
            entry(EntryKind::Ttl(TtlDirective { value: 3600 })),
            entry(EntryKind::Origin(OriginDirective {
                domain: "example.com.".into(),
            })),
            entry(EntryKind::Record(www)),
            entry(EntryKind::Include(IncludeDirective {
                filename: "hosts.zone".into(),
                path: PathBuf::from("hosts.zone"),
            })),
            entry(EntryKind::Origin(OriginDirective {
                domain: "sub.example.com.".into(),
            })),
            entry(EntryKind::Generate(GenerateDirective {
                range: "1-3".into(),
                owner: "h$".into(),
                rtype: "A".into(),
                rdata: "10.0.0.$".into(),
                ttl: 3600,
                class: "IN".into(),
                origin: "sub.example.com.".into(),
            })),
        ];
        let zone = Zone::new(
            entries,
            ZoneMetadata {
                origin: "example.com.".into(),
                ttl: 3600,
            },
            HashMap::new(),
        );

        let mut out = Vec::new();
        zone.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "$ORIGIN example.com.\n$TTL 3600\n\n\
             www\tIN\tCNAME\texample.com.\n\n\
             ; $INCLUDE hosts.zone\n\
             $ORIGIN sub.example.com.\n\
             $GENERATE 1-3 h$ IN A \"10.0.0.$\"\n"
        );
    }

    #[test]
    fn hosts_follow_the_origin_in_force() {
        let entries = vec![
            entry(origin("example.com.")),
            entry(EntryKind::Record(host_with_a("a.example.com.", 3600))),
            entry(origin("sub.example.com.")),
            entry(EntryKind::Record(host_with_a("b.sub.example.com.", 3600))),
            entry(origin("example.com.")),
            entry(EntryKind::Ttl(TtlDirective { value: 60 })),
            entry(EntryKind::Record(host_with_a("c.example.com.", 60))),
        ];
        let zone = Zone::new(
            entries,
            ZoneMetadata {
                origin: "example.com.".into(),
                ttl: 3600,
            },
            HashMap::new(),
        );

        let mut out = Vec::new();
        zone.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "$ORIGIN example.com.\n$TTL 3600\n\n\
             a\tIN\tA\t10.0.0.1\n\n\
             $ORIGIN sub.example.com.\n\
             b\tIN\tA\t10.0.0.1\n\n\
             $ORIGIN example.com.\n\
             $TTL 60\n\
             c\tIN\tA\t10.0.0.1\n\n"
        );
    }
}

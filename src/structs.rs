use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::PathBuf;
use std::slice;

use crate::rrdata::RRData;

/// Fields every resource record carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub ttl: u32,
    pub class: String,
}

impl ResourceRecord {
    pub fn new<C: Into<String>>(ttl: u32, class: C) -> ResourceRecord {
        ResourceRecord {
            ttl,
            class: class.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ARecord {
    pub rr: ResourceRecord,
    pub address: Ipv4Addr,
    /// Set by an `; inaddr` comment. Reverse zone generation skips the record.
    pub inaddr: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AaaaRecord {
    pub rr: ResourceRecord,
    pub address: Ipv6Addr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnameRecord {
    pub rr: ResourceRecord,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxRecord {
    pub rr: ResourceRecord,
    pub priority: u16,
    pub mail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxtRecord {
    pub rr: ResourceRecord,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsRecord {
    pub rr: ResourceRecord,
    pub name_server: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaRecord {
    pub rr: ResourceRecord,
    pub primary_ns: String,
    pub email: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum_ttl: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtrRecord {
    pub rr: ResourceRecord,
    pub pointer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvRecord {
    pub rr: ResourceRecord,
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaaRecord {
    pub rr: ResourceRecord,
    pub flags: u8,
    pub tag: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HinfoRecord {
    pub rr: ResourceRecord,
    pub cpu: String,
    pub os: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaptrRecord {
    pub rr: ResourceRecord,
    pub order: u16,
    pub preference: u16,
    pub flags: String,
    pub service: String,
    pub regexp: String,
    pub replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfRecord {
    pub rr: ResourceRecord,
    pub text: String,
}

/// All records of one hostname, grouped by type in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsRecords {
    pub a: Vec<ARecord>,
    pub aaaa: Vec<AaaaRecord>,
    pub cname: Vec<CnameRecord>,
    pub mx: Vec<MxRecord>,
    pub txt: Vec<TxtRecord>,
    pub ns: Vec<NsRecord>,
    pub soa: Vec<SoaRecord>,
    pub ptr: Vec<PtrRecord>,
    pub srv: Vec<SrvRecord>,
    pub caa: Vec<CaaRecord>,
    pub hinfo: Vec<HinfoRecord>,
    pub naptr: Vec<NaptrRecord>,
    pub spf: Vec<SpfRecord>,
}

impl DnsRecords {
    pub fn push(&mut self, data: RRData) {
        match data {
            RRData::A(r) => self.a.push(r),
            RRData::AAAA(r) => self.aaaa.push(r),
            RRData::CNAME(r) => self.cname.push(r),
            RRData::MX(r) => self.mx.push(r),
            RRData::TXT(r) => self.txt.push(r),
            RRData::NS(r) => self.ns.push(r),
            RRData::SOA(r) => self.soa.push(r),
            RRData::PTR(r) => self.ptr.push(r),
            RRData::SRV(r) => self.srv.push(r),
            RRData::CAA(r) => self.caa.push(r),
            RRData::HINFO(r) => self.hinfo.push(r),
            RRData::NAPTR(r) => self.naptr.push(r),
            RRData::SPF(r) => self.spf.push(r),
        }
    }

    /// Total number of records over all types
    pub fn len(&self) -> usize {
        self.a.len()
            + self.aaaa.len()
            + self.cname.len()
            + self.mx.len()
            + self.txt.len()
            + self.ns.len()
            + self.soa.len()
            + self.ptr.len()
            + self.srv.len()
            + self.caa.len()
            + self.hinfo.len()
            + self.naptr.len()
            + self.spf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every record of a single fully-qualified hostname
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub hostname: String,
    pub records: DnsRecords,
}

impl HostRecord {
    pub fn new<S: Into<String>>(hostname: S) -> HostRecord {
        HostRecord {
            hostname: hostname.into(),
            records: DnsRecords::default(),
        }
    }
}

/// A `$GENERATE` directive, captured without expansion
///
/// `ttl`, `class` and `origin` are the values in force where the directive
/// was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateDirective {
    pub range: String,
    pub owner: String,
    pub rtype: String,
    pub rdata: String,
    pub ttl: u32,
    pub class: String,
    pub origin: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlDirective {
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginDirective {
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    /// File name as written in the directive
    pub filename: String,
    /// Where the file was looked up
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Record(HostRecord),
    Generate(GenerateDirective),
    Ttl(TtlDirective),
    Origin(OriginDirective),
    Include(IncludeDirective),
}

/// A single entry of a zone, in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneEntry {
    pub kind: EntryKind,
    /// First source line of the entry
    pub raw_line: String,
    pub source_file: PathBuf,
}

impl ZoneEntry {
    pub fn host_record(&self) -> Option<&HostRecord> {
        match self.kind {
            EntryKind::Record(ref host) => Some(host),
            _ => None,
        }
    }

    pub(crate) fn host_record_mut(&mut self) -> Option<&mut HostRecord> {
        match self.kind {
            EntryKind::Record(ref mut host) => Some(host),
            _ => None,
        }
    }
}

/// Zone-level values in force at the end of the parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneMetadata {
    pub origin: String,
    pub ttl: u32,
}

/// Parsed zone
///
/// Entries are read-only so the hostname index stays in step with them.
#[derive(Debug, Clone)]
pub struct Zone {
    entries: Vec<ZoneEntry>,
    pub metadata: ZoneMetadata,
    index: HashMap<String, usize>,
}

impl Zone {
    pub(crate) fn new(
        entries: Vec<ZoneEntry>,
        metadata: ZoneMetadata,
        index: HashMap<String, usize>,
    ) -> Zone {
        Zone {
            entries,
            metadata,
            index,
        }
    }

    /// Every entry in file order, included files inline
    pub fn entries(&self) -> &[ZoneEntry] {
        &self.entries
    }

    /// Looks up the records of a fully-qualified hostname
    pub fn host(&self, hostname: &str) -> Option<&HostRecord> {
        self.index
            .get(hostname)
            .and_then(|&i| self.entries.get(i))
            .and_then(ZoneEntry::host_record)
    }

    /// Host records in order of first appearance
    pub fn hosts(&self) -> Hosts<'_> {
        Hosts {
            entries: self.entries.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Zone {
    type Item = &'a ZoneEntry;
    type IntoIter = slice::Iter<'a, ZoneEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Returned by [`Zone::hosts`](struct.Zone.html#method.hosts)
pub struct Hosts<'a> {
    entries: slice::Iter<'a, ZoneEntry>,
}

impl<'a> Iterator for Hosts<'a> {
    type Item = &'a HostRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.by_ref().find_map(ZoneEntry::host_record)
    }
}

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::SyntaxError;
use crate::lexer::{parse_decimal, strip_quotes};
use crate::name::qualify;
use crate::structs::*;

/// Record classes accepted in the class column
pub const CLASSES: [&str; 4] = ["IN", "CH", "HS", "CS"];

pub const CLASS_IN: &str = "IN";

/// Returns the canonical class name when the token is a class
pub fn class_from_token(token: &str) -> Option<&'static str> {
    CLASSES
        .iter()
        .copied()
        .find(|class| class.eq_ignore_ascii_case(token))
}

/// The resource record types the parser understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    MX,
    TXT,
    NS,
    SOA,
    PTR,
    SRV,
    CAA,
    HINFO,
    NAPTR,
    SPF,
}

impl RecordType {
    pub const ALL: [RecordType; 13] = [
        RecordType::A,
        RecordType::AAAA,
        RecordType::CNAME,
        RecordType::MX,
        RecordType::TXT,
        RecordType::NS,
        RecordType::SOA,
        RecordType::PTR,
        RecordType::SRV,
        RecordType::CAA,
        RecordType::HINFO,
        RecordType::NAPTR,
        RecordType::SPF,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::NS => "NS",
            RecordType::SOA => "SOA",
            RecordType::PTR => "PTR",
            RecordType::SRV => "SRV",
            RecordType::CAA => "CAA",
            RecordType::HINFO => "HINFO",
            RecordType::NAPTR => "NAPTR",
            RecordType::SPF => "SPF",
        }
    }

    /// Case-insensitive lookup of a type mnemonic
    pub fn from_token(token: &str) -> Option<RecordType> {
        RecordType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(token))
    }
}

impl FromStr for RecordType {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::from_token(s).ok_or_else(|| SyntaxError::MissingType(s.to_owned()))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed record as read from one record line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RRData {
    A(ARecord),
    AAAA(AaaaRecord),
    CNAME(CnameRecord),
    MX(MxRecord),
    TXT(TxtRecord),
    NS(NsRecord),
    SOA(SoaRecord),
    PTR(PtrRecord),
    SRV(SrvRecord),
    CAA(CaaRecord),
    HINFO(HinfoRecord),
    NAPTR(NaptrRecord),
    SPF(SpfRecord),
}

impl RRData {
    pub fn rtype(&self) -> RecordType {
        match *self {
            RRData::A(..) => RecordType::A,
            RRData::AAAA(..) => RecordType::AAAA,
            RRData::CNAME(..) => RecordType::CNAME,
            RRData::MX(..) => RecordType::MX,
            RRData::TXT(..) => RecordType::TXT,
            RRData::NS(..) => RecordType::NS,
            RRData::SOA(..) => RecordType::SOA,
            RRData::PTR(..) => RecordType::PTR,
            RRData::SRV(..) => RecordType::SRV,
            RRData::CAA(..) => RecordType::CAA,
            RRData::HINFO(..) => RecordType::HINFO,
            RRData::NAPTR(..) => RecordType::NAPTR,
            RRData::SPF(..) => RecordType::SPF,
        }
    }

    pub fn rr(&self) -> &ResourceRecord {
        match *self {
            RRData::A(ref r) => &r.rr,
            RRData::AAAA(ref r) => &r.rr,
            RRData::CNAME(ref r) => &r.rr,
            RRData::MX(ref r) => &r.rr,
            RRData::TXT(ref r) => &r.rr,
            RRData::NS(ref r) => &r.rr,
            RRData::SOA(ref r) => &r.rr,
            RRData::PTR(ref r) => &r.rr,
            RRData::SRV(ref r) => &r.rr,
            RRData::CAA(ref r) => &r.rr,
            RRData::HINFO(ref r) => &r.rr,
            RRData::NAPTR(ref r) => &r.rr,
            RRData::SPF(ref r) => &r.rr,
        }
    }

    /// Parses the data fields of a record line
    ///
    /// `data` holds the tokens after the type column, `comment` the trimmed
    /// line comment. Relative names in the data are qualified with `origin`.
    /// Grouping parentheses are dropped before the fields are counted.
    pub fn parse<S: AsRef<str>>(
        rtype: RecordType,
        rr: ResourceRecord,
        data: &[S],
        comment: &str,
        origin: &str,
    ) -> Result<RRData, SyntaxError> {
        let data: Vec<&str> = data
            .iter()
            .map(|field| field.as_ref().trim_matches(|c: char| c == '(' || c == ')'))
            .filter(|field| !field.is_empty())
            .collect();
        let name = rtype.as_str();

        match rtype {
            RecordType::A => {
                require(rtype, &data, 1)?;
                let address = data[0]
                    .parse::<Ipv4Addr>()
                    .map_err(|_| SyntaxError::InvalidIpv4(data[0].to_owned()))?;
                let comment = comment.to_ascii_lowercase();
                Ok(RRData::A(ARecord {
                    rr,
                    address,
                    inaddr: comment == "inaddr" || comment == "in-addr",
                }))
            }
            RecordType::AAAA => {
                require(rtype, &data, 1)?;
                let address = data[0]
                    .parse::<Ipv6Addr>()
                    .ok()
                    .filter(|ip| ip.to_ipv4_mapped().is_none())
                    .ok_or_else(|| SyntaxError::InvalidIpv6(data[0].to_owned()))?;
                Ok(RRData::AAAA(AaaaRecord { rr, address }))
            }
            RecordType::CNAME => {
                require(rtype, &data, 1)?;
                Ok(RRData::CNAME(CnameRecord {
                    rr,
                    target: qualify(data[0], origin),
                }))
            }
            RecordType::MX => {
                let mut data = data;
                if data.len() == 1 && data[0].contains(' ') {
                    data = strip_quotes(data[0]).split_whitespace().collect();
                }
                require(rtype, &data, 2)?;
                Ok(RRData::MX(MxRecord {
                    rr,
                    priority: number(name, "priority", data[0])?,
                    mail: qualify(data[1], origin),
                }))
            }
            RecordType::TXT => {
                require(rtype, &data, 1)?;
                Ok(RRData::TXT(TxtRecord {
                    rr,
                    text: txt_content(&data),
                }))
            }
            RecordType::NS => {
                require(rtype, &data, 1)?;
                Ok(RRData::NS(NsRecord {
                    rr,
                    name_server: qualify(data[0], origin),
                }))
            }
            RecordType::SOA => {
                require(rtype, &data, 7)?;
                Ok(RRData::SOA(SoaRecord {
                    rr,
                    primary_ns: qualify(data[0], origin),
                    email: qualify(data[1], origin),
                    serial: number(name, "serial", data[2])?,
                    refresh: number(name, "refresh", data[3])?,
                    retry: number(name, "retry", data[4])?,
                    expire: number(name, "expire", data[5])?,
                    minimum_ttl: number(name, "minimum TTL", data[6])?,
                }))
            }
            RecordType::PTR => {
                require(rtype, &data, 1)?;
                Ok(RRData::PTR(PtrRecord {
                    rr,
                    pointer: qualify(data[0], origin),
                }))
            }
            RecordType::SRV => {
                require(rtype, &data, 4)?;
                Ok(RRData::SRV(SrvRecord {
                    rr,
                    priority: number(name, "priority", data[0])?,
                    weight: number(name, "weight", data[1])?,
                    port: number(name, "port", data[2])?,
                    target: qualify(data[3], origin),
                }))
            }
            RecordType::CAA => {
                require(rtype, &data, 3)?;
                Ok(RRData::CAA(CaaRecord {
                    rr,
                    flags: number(name, "flags", data[0])?,
                    tag: strip_quotes(data[1]).to_owned(),
                    value: strip_quotes(&data[2..].join(" ")).to_owned(),
                }))
            }
            RecordType::HINFO => {
                require(rtype, &data, 2)?;
                Ok(RRData::HINFO(HinfoRecord {
                    rr,
                    cpu: strip_quotes(data[0]).to_owned(),
                    os: strip_quotes(data[1]).to_owned(),
                }))
            }
            RecordType::NAPTR => {
                require(rtype, &data, 6)?;
                Ok(RRData::NAPTR(NaptrRecord {
                    rr,
                    order: number(name, "order", data[0])?,
                    preference: number(name, "preference", data[1])?,
                    flags: strip_quotes(data[2]).to_owned(),
                    service: strip_quotes(data[3]).to_owned(),
                    regexp: strip_quotes(data[4]).to_owned(),
                    replacement: qualify(data[5], origin),
                }))
            }
            RecordType::SPF => {
                require(rtype, &data, 1)?;
                Ok(RRData::SPF(SpfRecord {
                    rr,
                    text: txt_content(&data),
                }))
            }
        }
    }
}

fn require(rtype: RecordType, data: &[&str], expected: usize) -> Result<(), SyntaxError> {
    if data.len() < expected {
        return Err(SyntaxError::MissingFields {
            rtype: rtype.as_str(),
            expected,
            found: data.len(),
        });
    }
    Ok(())
}

fn number<T: FromStr>(
    rtype: &'static str,
    field: &'static str,
    value: &str,
) -> Result<T, SyntaxError> {
    parse_decimal(value).ok_or_else(|| SyntaxError::InvalidNumber {
        rtype,
        field,
        value: value.to_owned(),
    })
}

/// Joins TXT-style data
///
/// A single quoted string loses its quotes. With more than one quoted
/// segment every quote is kept.
pub fn txt_content<S: AsRef<str>>(data: &[S]) -> String {
    let content = data
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join(" ");
    let quotes = content.matches('"').count();
    if quotes == 2 && content.len() >= 2 && content.starts_with('"') && content.ends_with('"') {
        return content[1..content.len() - 1].to_owned();
    }
    content
}

//! Responses for Network service Commands
//!
//! The `+COPS=?` information text is a label followed by parenthesized
//! operator tuples:
//!
//! ```text
//! +COPS: (2,"Telekom.de","TDG","26201",7),(1,"Vodafone.de","VF","26202",7),,(0,1,2,3,4),(0,1,2)
//! ```
//!
//! Modems disagree on what follows the operator tuples (supported modes and
//! formats, nothing at all, trailing garbage), so the list is walked group by
//! group instead of being deserialized in one pass.

use atat::AtatResp;

use super::types::OperatorStatus;
use crate::registry::{OperatorRecord, PlmnId, PlmnRegistry};

/// 7.5 Operator selection +COPS, test command response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorList {
    pub operators: PlmnRegistry,
    pub report: ParseReport,
}

impl AtatResp for OperatorList {}

/// What happened while walking one operator list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseReport {
    /// Parenthesized groups found.
    pub groups: usize,
    /// Records appended to the registry.
    pub accepted: usize,
    /// Groups without a quoted numeric `<oper>` in the 4th field.
    pub discarded: usize,
    /// Records that did not fit the registry.
    pub dropped: usize,
    /// `<stat>` fields that were not a number and fell back to unknown.
    pub malformed: usize,
}

/// Parses the response to [`GetOperatorList`](super::GetOperatorList) into
/// `registry`.
///
/// Never fails: unusable groups are skipped and counted in the returned
/// [`ParseReport`]. Walking stops at the first `(` without a matching `)`.
pub fn parse_operator_list<const N: usize>(
    response: &str,
    registry: &mut PlmnRegistry<N>,
) -> ParseReport {
    let mut report = ParseReport::default();
    let mut rest = response;

    while let Some((group, tail)) = next_group(rest) {
        rest = tail;
        report.groups += 1;

        match parse_operator(group, &mut report) {
            Some(record) if registry.add(record) => report.accepted += 1,
            Some(_) => report.dropped += 1,
            None => report.discarded += 1,
        }
    }

    report
}

/// Splits off the content of the next `(`..`)` group.
fn next_group(s: &str) -> Option<(&str, &str)> {
    let start = find_unquoted(s, b'(')? + 1;
    let len = find_unquoted(&s[start..], b')')?;
    Some((&s[start..start + len], &s[start + len + 1..]))
}

fn parse_operator(group: &str, report: &mut ParseReport) -> Option<OperatorRecord> {
    let mut fields = Fields::new(group);
    let stat = fields.next()?;
    let oper = fields.nth(2)?;

    let status = match stat.trim().parse::<u8>() {
        Ok(v) => OperatorStatus::from(v),
        Err(_) => {
            report.malformed += 1;
            OperatorStatus::Unknown
        }
    };

    let oper = oper.trim().strip_prefix('"')?;
    let oper = oper.strip_suffix('"').unwrap_or(oper);

    Some(OperatorRecord {
        status,
        plmn: PlmnId::parse(oper)?,
    })
}

/// Byte offset of the first `needle` outside double quotes.
fn find_unquoted(s: &str, needle: u8) -> Option<usize> {
    let mut quoted = false;
    s.bytes().position(|b| {
        if b == b'"' {
            quoted = !quoted;
            false
        } else {
            !quoted && b == needle
        }
    })
}

/// Comma separated fields of a group. Commas inside quoted operator names do
/// not split.
struct Fields<'a> {
    rest: Option<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: Some(s) }
    }
}

impl<'a> Iterator for Fields<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        match find_unquoted(rest, b',') {
            Some(i) => {
                self.rest = Some(&rest[i + 1..]);
                Some(&rest[..i])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

use serde::Deserialize;

use crate::{Result, NO_BANNER};

/// Body of `/api/search_total`.
#[derive(Debug, Deserialize)]
pub struct TotalResponse {
    pub total: u64,
}

/// Body of `/api/search`. Only the fields the report needs are kept.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Match {
    pub ip: String,
    pub portinfo: PortInfo,
    #[serde(default)]
    pub banner: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortInfo {
    pub port: u16,
}

pub fn parse_total(body: &str) -> Result<u64> {
    Ok(serde_json::from_str::<TotalResponse>(body)?.total)
}

pub fn parse_matches(body: &str) -> Result<Vec<Match>> {
    Ok(serde_json::from_str::<SearchResponse>(body)?.matches)
}

/// First line of the trimmed banner, or the placeholder if there's nothing left.
pub fn banner_line(banner: &str) -> &str {
    let first = banner.trim().split('\n').next().unwrap_or_default().trim();
    if first.is_empty() {
        NO_BANNER
    } else {
        first
    }
}

/// Formats one CSV row: `"{ip}, {port}, {banner}\n"`.
pub fn fmt_row(m: &Match) -> String {
    format!("{}, {}, {}\n", m.ip, m.portinfo.port, banner_line(&m.banner))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(ip: &str, port: u16, banner: &str) -> Match {
        Match {
            ip: ip.into(),
            portinfo: PortInfo { port },
            banner: banner.into(),
        }
    }

    #[test]
    fn empty_banner_gets_placeholder() {
        assert_eq!(fmt_row(&m("1.2.3.4", 80, "")), "1.2.3.4, 80, NoBannerSorry\n");
        assert_eq!(banner_line("  \n\t "), NO_BANNER);
    }

    #[test]
    fn multiline_banner_keeps_first_line() {
        let row = fmt_row(&m("10.0.0.1", 22, "\n  SSH-2.0-OpenSSH_8.9\r\nProtocol mismatch.\n"));
        assert_eq!(row, "10.0.0.1, 22, SSH-2.0-OpenSSH_8.9\n");
    }

    #[test]
    fn parses_search_page() {
        let body = r#"{"matches":[
            {"ip":"8.8.8.8","portinfo":{"port":53,"service":"dns"},"banner":"x"},
            {"ip":"1.1.1.1","portinfo":{"port":443}}
        ],"status":200}"#;
        let matches = parse_matches(body).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].banner, "");
        assert_eq!(fmt_row(&matches[1]), "1.1.1.1, 443, NoBannerSorry\n");
    }

    #[test]
    fn malformed_total_is_an_error() {
        assert_eq!(parse_total(r#"{"total": 240}"#).unwrap(), 240);
        assert!(parse_total(r#"{"count": 240}"#).is_err());
        assert!(parse_total("<html>").is_err());
    }
}

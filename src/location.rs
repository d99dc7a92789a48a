//! Position fixes read from the modem and the map link sent for them.

use core::fmt::Write;

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::config::{MAX_COORD_LEN, MAX_LINK_LEN};
use crate::error::Error;

pub const MAP_LINK_PREFIX: &str = "https://www.google.com/maps/search/?api=1&query=";

pub type Coordinate = String<MAX_COORD_LEN>;
pub type MapLink = String<MAX_LINK_LEN>;

/// Latitude and longitude exactly as the modem printed them.
///
/// The textual form is kept so the link carries the receiver's precision
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
}

impl LocationFix {
    pub const fn unset() -> Self {
        Self {
            latitude: None,
            longitude: None,
        }
    }

    pub fn new(latitude: &str, longitude: &str) -> Result<Self, Error> {
        Ok(Self {
            latitude: Some(coordinate(latitude, 90.0)?),
            longitude: Some(coordinate(longitude, 180.0)?),
        })
    }

    /// Extract the fix from a `+LOCATION` reply.
    ///
    /// The reply may be surrounded by the command echo, blank lines and the
    /// final result code. The first line of the form `<lat>,<lon>` wins. A
    /// reply without such a line, `GPS NOT FIX NOW` included, yields an unset
    /// fix.
    pub fn parse(reply: &[u8]) -> Self {
        reply
            .split(|&b| b == b'\r' || b == b'\n')
            .filter_map(|line| core::str::from_utf8(line).ok())
            .find_map(|line| {
                let (lat, lon) = line.trim().split_once(',')?;
                Self::new(lat.trim(), lon.trim()).ok()
            })
            .unwrap_or_default()
    }

    pub fn is_set(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Validate a decimal coordinate token: optional sign, digits, at most one
/// decimal point, magnitude within `limit` degrees.
fn coordinate(token: &str, limit: f64) -> Result<Coordinate, Error> {
    let digits = token
        .strip_prefix('-')
        .or_else(|| token.strip_prefix('+'))
        .unwrap_or(token);

    let mut parts = digits.splitn(2, '.');
    let int = parts.next().unwrap_or("");
    let frac = parts.next().unwrap_or("");

    let well_formed = !int.is_empty()
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit())
        && !(digits.ends_with('.'));

    if !well_formed {
        return Err(Error::IncompleteFix);
    }

    match token.parse::<f64>() {
        Ok(v) if v.abs() <= limit => {}
        _ => return Err(Error::IncompleteFix),
    }

    Coordinate::try_from(token).map_err(|_| Error::IncompleteFix)
}

/// Build the map link for `fix`.
///
/// Fails with [`Error::IncompleteFix`] when either coordinate is unset. The
/// output is bounded by [`MAX_LINK_LEN`].
pub fn format_link(fix: &LocationFix) -> Result<MapLink, Error> {
    let (Some(lat), Some(lon)) = (&fix.latitude, &fix.longitude) else {
        return Err(Error::IncompleteFix);
    };

    let mut link = MapLink::new();
    write!(link, "{}{},{}", MAP_LINK_PREFIX, lat, lon).map_err(|_| Error::Overflow)?;
    Ok(link)
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn query(link: &str) -> (&str, &str) {
        let query = link
            .split_once('?')
            .unwrap()
            .1
            .split('&')
            .find_map(|kv| kv.strip_prefix("query="))
            .unwrap();
        query.split_once(',').unwrap()
    }

    #[test]
    fn link_for_reference_fix() {
        let fix = LocationFix::parse(b"-34.8799074,174.7565664");
        assert_eq!(
            format_link(&fix).unwrap().as_str(),
            "https://www.google.com/maps/search/?api=1&query=-34.8799074,174.7565664"
        );
    }

    fn coordinate_text(negative: bool, int: u32, frac: &str) -> std::string::String {
        let sign = if negative { "-" } else { "" };
        if frac.is_empty() {
            std::format!("{}{}", sign, int)
        } else {
            std::format!("{}{}.{}", sign, int, frac)
        }
    }

    proptest! {
        #[test]
        fn link_round_trips_coordinates(
            lat_neg in any::<bool>(),
            lat_int in 0u32..90,
            lat_frac in "[0-9]{0,7}",
            lon_neg in any::<bool>(),
            lon_int in 0u32..180,
            lon_frac in "[0-9]{0,7}",
        ) {
            let lat = coordinate_text(lat_neg, lat_int, &lat_frac);
            let lon = coordinate_text(lon_neg, lon_int, &lon_frac);

            let fix = LocationFix::new(&lat, &lon).unwrap();
            let link = format_link(&fix).unwrap();
            prop_assert!(link.len() <= MAX_LINK_LEN);
            prop_assert_eq!(query(&link), (lat.as_str(), lon.as_str()));
        }
    }

    #[test]
    fn boundary_coordinates_accepted() {
        for (lat, lon) in [("90", "-180"), ("-90", "180"), ("+12.5", "-0.000001")] {
            let link = format_link(&LocationFix::new(lat, lon).unwrap()).unwrap();
            assert_eq!(query(&link), (lat, lon));
        }
    }

    #[test]
    fn parse_skips_echo_and_result_code() {
        let fix = LocationFix::parse(b"AT+LOCATION=2\r\r\n22.123456,113.654321\r\n\r\nOK\r\n");
        assert_eq!(fix.latitude.as_deref(), Some("22.123456"));
        assert_eq!(fix.longitude.as_deref(), Some("113.654321"));
    }

    #[test]
    fn no_fix_reply_is_unset() {
        assert!(!LocationFix::parse(b"\r\nGPS NOT FIX NOW\r\n\r\nOK\r\n").is_set());
        assert!(!LocationFix::parse(b"").is_set());
        assert!(!LocationFix::parse(b"+CME ERROR: 50\r\n").is_set());
    }

    #[test]
    fn malformed_or_out_of_range_tokens_rejected() {
        for (lat, lon) in [
            ("-121.411", "242.135"),
            ("12.", "3"),
            ("1.2.3", "4"),
            ("abc", "1"),
            ("", "1"),
            ("-", "1"),
            ("123456789012345678", "1"),
        ] {
            assert_eq!(LocationFix::new(lat, lon), Err(Error::IncompleteFix));
        }
    }

    #[test]
    fn oversized_reply_does_not_overflow() {
        let mut reply = [b'1'; 600];
        reply[300] = b',';
        let fix = LocationFix::parse(&reply);
        assert!(!fix.is_set());
        assert_eq!(format_link(&fix), Err(Error::IncompleteFix));
    }

    #[test]
    fn unset_fix_has_no_link() {
        assert_eq!(format_link(&LocationFix::unset()), Err(Error::IncompleteFix));
        let half = LocationFix {
            latitude: Some(Coordinate::try_from("1.0").unwrap()),
            longitude: None,
        };
        assert_eq!(format_link(&half), Err(Error::IncompleteFix));
    }
}

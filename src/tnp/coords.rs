use crate::tnp::syntax::SyntaxError;
use crate::types::GeoPoint;

/// Meters per nautical mile
pub const METERS_PER_NM: f64 = 1852.0;

/// Parse `DD..MMSS` digits into degrees, checking minutes and seconds
fn parse_dms(digits: &str, degree_digits: usize, max_degrees: u32) -> Option<f64> {
    if digits.len() != degree_digits + 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let degrees: u32 = digits[..degree_digits].parse().ok()?;
    let minutes: u32 = digits[degree_digits..degree_digits + 2].parse().ok()?;
    let seconds: u32 = digits[degree_digits + 2..].parse().ok()?;

    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    let value = degrees as f64 + minutes as f64 / 60.0 + seconds as f64 / 3600.0;
    (value <= max_degrees as f64).then_some(value)
}

/// Parse a latitude like `N513012` into radians
pub fn parse_lat(token: &str) -> Result<f64, SyntaxError> {
    let sign = match token.as_bytes().first() {
        Some(b'N') => 1.0,
        Some(b'S') => -1.0,
        _ => return Err(SyntaxError::InvalidLatitude(token.to_string())),
    };

    parse_dms(&token[1..], 2, 90)
        .map(|degrees| (sign * degrees).to_radians())
        .ok_or_else(|| SyntaxError::InvalidLatitude(token.to_string()))
}

/// Parse a longitude like `W0012030` into radians
pub fn parse_lon(token: &str) -> Result<f64, SyntaxError> {
    let sign = match token.as_bytes().first() {
        Some(b'E') => 1.0,
        Some(b'W') => -1.0,
        _ => return Err(SyntaxError::InvalidLongitude(token.to_string())),
    };

    parse_dms(&token[1..], 3, 180)
        .map(|degrees| (sign * degrees).to_radians())
        .ok_or_else(|| SyntaxError::InvalidLongitude(token.to_string()))
}

pub fn parse_point(lat: &str, lon: &str) -> Result<GeoPoint, SyntaxError> {
    Ok(GeoPoint::new(parse_lat(lat)?, parse_lon(lon)?))
}

/// Parse a radius in nautical miles and return meters
pub fn parse_radius(token: &str) -> Result<f64, SyntaxError> {
    let valid = !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && token.bytes().filter(|&b| b == b'.').count() <= 1
        && token != ".";

    if !valid {
        return Err(SyntaxError::InvalidRadius(token.to_string()));
    }

    token
        .parse::<f64>()
        .map(|nm| nm * METERS_PER_NM)
        .map_err(|_| SyntaxError::InvalidRadius(token.to_string()))
}

use crate::domain::model::{FareOption, GeoPoint};
use crate::utils::error::{FlightsError, Result};

/// 一位成人、零兒童、零嬰兒
const PASSENGERS: &str = "1";

/// Search-results link for one itinerary, e.g. `aviasales.ru/search/IEV2301TLL2401` + passengers.
///
/// Dates are taken as `YYYY-MM-DD`: day is the third dash-separated part, month the second.
pub fn build(
    prefix: &str,
    origin: &GeoPoint,
    destination: &GeoPoint,
    option: &FareOption,
) -> Result<String> {
    let depart = day_month(&option.depart_date)?;
    let ret = day_month(&option.return_date)?;

    Ok(format!(
        "{prefix}{}{depart}{}{ret}{PASSENGERS}",
        origin.code, destination.code
    ))
}

fn day_month(date: &str) -> Result<String> {
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [_, month, day] => Ok(format!("{day}{month}")),
        _ => Err(FlightsError::InvalidDate {
            date: date.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(code: &str) -> GeoPoint {
        GeoPoint {
            code: code.to_string(),
            display_name: String::new(),
        }
    }

    fn option(depart: &str, ret: &str) -> FareOption {
        FareOption {
            price: 1000.0,
            depart_date: depart.to_string(),
            return_date: ret.to_string(),
            change_count: 0,
            source_site: "gate".to_string(),
            distance_km: 0,
        }
    }

    #[test]
    fn test_build_link() {
        let link = build(
            "aviasales.ru/search/",
            &point("IEV"),
            &point("TLL"),
            &option("2020-01-23", "2020-01-24"),
        )
        .unwrap();
        assert_eq!(link, "aviasales.ru/search/IEV2301TLL24011");
    }

    #[test]
    fn test_build_link_without_prefix() {
        let link = build("", &point("MOW"), &point("BCN"), &option("2014-12-01", "2014-12-15")).unwrap();
        assert_eq!(link, "MOW0112BCN15121");
    }

    #[test]
    fn test_wrong_date_format_fails() {
        for (depart, ret) in [
            ("2020/01/23", "2020-01-24"),
            ("2020-01-23", "2020-01"),
            ("2020-01-23-1", "2020-01-24"),
            ("", "2020-01-24"),
        ] {
            let err = build("", &point("IEV"), &point("TLL"), &option(depart, ret)).unwrap_err();
            assert!(matches!(err, FlightsError::InvalidDate { .. }), "{depart} / {ret}");
        }
    }
}

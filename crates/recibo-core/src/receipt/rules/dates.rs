//! Purchase date normalization.

use chrono::NaiveDate;
use regex::Regex;

use crate::error::ReceiptError;

use super::patterns::{DATE_DMY_DASH, DATE_DMY_DOT, DATE_DMY_SLASH, DATE_YMD_SLASH};

#[derive(Clone, Copy)]
enum FieldOrder {
    DayFirst,
    YearFirst,
}

/// Parse a purchase date.
///
/// Accepted shapes, tried in order: `DD/MM/YYYY`, `DD-MM-YYYY`, `DD.MM.YYYY`
/// and `YYYY/MM/DD`. Day and month are never swapped: `03/04/2024` is the
/// 3rd of April.
pub fn parse_date(token: &str) -> Result<NaiveDate, ReceiptError> {
    let shapes: [(&Regex, FieldOrder); 4] = [
        (&*DATE_DMY_SLASH, FieldOrder::DayFirst),
        (&*DATE_DMY_DASH, FieldOrder::DayFirst),
        (&*DATE_DMY_DOT, FieldOrder::DayFirst),
        (&*DATE_YMD_SLASH, FieldOrder::YearFirst),
    ];

    for (regex, order) in shapes {
        let Some(caps) = regex.captures(token) else {
            continue;
        };

        let (day, month, year) = match order {
            FieldOrder::DayFirst => (&caps[1], &caps[2], &caps[3]),
            FieldOrder::YearFirst => (&caps[3], &caps[2], &caps[1]),
        };

        // Captures are fixed-width digit runs, so these always parse.
        let day: u32 = day.parse().unwrap_or(0);
        let month: u32 = month.parse().unwrap_or(0);
        let year: i32 = year.parse().unwrap_or(0);

        return NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| ReceiptError::InvalidDate(token.trim().to_string()));
    }

    Err(ReceiptError::InvalidDate(token.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_day_first() {
        assert_eq!(parse_date("15/03/2024").unwrap(), date(2024, 3, 15));
        assert_eq!(parse_date("15-03-2024").unwrap(), date(2024, 3, 15));
        assert_eq!(parse_date("15.03.2024").unwrap(), date(2024, 3, 15));
    }

    #[test]
    fn test_parse_date_year_first_matches_day_first() {
        assert_eq!(parse_date("2024/03/15").unwrap(), parse_date("15/03/2024").unwrap());
    }

    #[test]
    fn test_ambiguous_date_is_day_first() {
        assert_eq!(parse_date("03/04/2024").unwrap(), date(2024, 4, 3));
    }

    #[test]
    fn test_date_inside_text() {
        assert_eq!(parse_date("Emissão: 01/02/2024 10:31").unwrap(), date(2024, 2, 1));
    }

    #[test]
    fn test_impossible_dates_are_rejected() {
        assert_eq!(
            parse_date("15/13/2024"),
            Err(ReceiptError::InvalidDate("15/13/2024".to_string()))
        );
        assert!(parse_date("30/02/2024").is_err());
    }

    #[test]
    fn test_unsupported_shapes_are_rejected() {
        assert!(parse_date("2024-03-15").is_err());
        assert!(parse_date("15/03/24").is_err());
        assert!(parse_date("ontem").is_err());
        assert!(parse_date("").is_err());
    }
}

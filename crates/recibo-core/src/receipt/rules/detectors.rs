//! Line detectors used for structural detection.

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::models::config::PatternRule;

use super::dates::parse_date;
use super::LineDetector;

/// Separators ending a store name on a header line.
const STORE_NAME_SEPARATORS: [char; 3] = ['-', '–', ':'];

/// Compile a pattern as a case-insensitive regex.
pub(crate) fn compile(pattern: &str) -> crate::Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

/// Detects the store name on a header line.
#[derive(Debug, Clone)]
pub struct StoreDetector {
    rules: Vec<(Regex, Option<String>)>,
}

impl StoreDetector {
    pub fn new(rules: &[PatternRule]) -> crate::Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| -> crate::Result<_> {
                Ok((compile(&rule.pattern)?, rule.label.clone()))
            })
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(Self { rules })
    }
}

impl LineDetector for StoreDetector {
    type Output = String;

    /// The first matching rule wins. Unlabeled rules take the text before the
    /// first separator on the line.
    fn detect(&self, line: &str) -> Option<String> {
        let (_, label) = self.rules.iter().find(|(regex, _)| regex.is_match(line))?;

        let name = match label {
            Some(label) => label.trim().to_string(),
            None => line
                .split(STORE_NAME_SEPARATORS)
                .next()
                .unwrap_or_default()
                .trim()
                .to_string(),
        };

        (!name.is_empty()).then_some(name)
    }
}

/// Detects a purchase date on a header line.
#[derive(Debug, Clone)]
pub struct DateDetector {
    shape: Regex,
}

impl DateDetector {
    pub fn new(shape: &str) -> crate::Result<Self> {
        Ok(Self {
            shape: Regex::new(shape)?,
        })
    }
}

impl LineDetector for DateDetector {
    type Output = NaiveDate;

    /// Only the first date-shaped substring is considered.
    fn detect(&self, line: &str) -> Option<NaiveDate> {
        let candidate = self.shape.find(line)?;

        match parse_date(candidate.as_str()) {
            Ok(date) => Some(date),
            Err(e) => {
                debug!("Ignoring date-shaped text: {}", e);
                None
            }
        }
    }
}

/// Matches lines satisfying every one of its keyword patterns.
#[derive(Debug, Clone)]
pub struct KeywordDetector {
    all_of: Vec<Regex>,
}

impl KeywordDetector {
    pub fn all_of(patterns: &[&str]) -> crate::Result<Self> {
        let all_of = patterns
            .iter()
            .map(|p| compile(p))
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(Self { all_of })
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.detect(line).is_some()
    }
}

impl LineDetector for KeywordDetector {
    type Output = ();

    fn detect(&self, line: &str) -> Option<()> {
        self.all_of
            .iter()
            .all(|regex| regex.is_match(line))
            .then_some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_store_detector() -> StoreDetector {
        StoreDetector::new(&[
            PatternRule::new("REDE SOL"),
            PatternRule::new("MERCADO"),
            PatternRule::labeled("ATACAD[AÃ]O", "Atacadão"),
        ])
        .unwrap()
    }

    #[test]
    fn test_store_name_before_separator() {
        let detector = default_store_detector();

        assert_eq!(
            detector.detect("SUPERMERCADO ABC - 15.03.2024"),
            Some("SUPERMERCADO ABC".to_string())
        );
        assert_eq!(
            detector.detect("Mercado Bom Preço: CNPJ 00.000.000/0001-00"),
            Some("Mercado Bom Preço".to_string())
        );
        assert_eq!(
            detector.detect("REDE SOL – Loja 12"),
            Some("REDE SOL".to_string())
        );
    }

    #[test]
    fn test_store_label_overrides_line_text() {
        let detector = default_store_detector();
        assert_eq!(
            detector.detect("ATACADAO S.A. FILIAL 33"),
            Some("Atacadão".to_string())
        );
    }

    #[test]
    fn test_store_detector_passes() {
        let detector = default_store_detector();
        assert_eq!(detector.detect("CNPJ 12.345.678/0001-90"), None);
        assert_eq!(detector.detect("- MERCADO"), None);
    }

    #[test]
    fn test_date_detector() {
        let detector = DateDetector::new(r"\d{2}.\d{2}.\d{4}").unwrap();

        assert_eq!(
            detector.detect("SUPERMERCADO ABC - 15.03.2024"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(
            detector.detect("Emissao 01/02/2024 10:31"),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
        assert_eq!(detector.detect("15x03x2024"), None);
        assert_eq!(detector.detect("99/99/2024"), None);
    }

    #[test]
    fn test_keyword_detector_requires_all() {
        let detector = KeywordDetector::all_of(&["PRODUTO|ITEM", "QTDE?|QUANT", "PRE[ÇC]O|VALOR"]).unwrap();

        assert!(detector.is_match("ITEM  DESCRIÇÃO  QTD  VL UNIT  VALOR"));
        assert!(detector.is_match("produto quant preço"));
        assert!(!detector.is_match("PRODUTO VALOR"));
    }
}

//! Product categorization from product names.

use std::fmt;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::models::config::CategoryRule;

/// Grocery category of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Alimentos,
    Bebidas,
    Limpeza,
    Higiene,
    Hortifruti,
    Padaria,
    Carnes,
    #[serde(rename = "Laticínios")]
    Laticinios,
    Outros,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Alimentos => "Alimentos",
            Category::Bebidas => "Bebidas",
            Category::Limpeza => "Limpeza",
            Category::Higiene => "Higiene",
            Category::Hortifruti => "Hortifruti",
            Category::Padaria => "Padaria",
            Category::Carnes => "Carnes",
            Category::Laticinios => "Laticínios",
            Category::Outros => "Outros",
        };
        f.write_str(name)
    }
}

/// Built-in Brazilian grocery rules.
pub fn default_category_rules() -> Vec<CategoryRule> {
    vec![
        // "água sanitária" would otherwise land in Bebidas
        CategoryRule::new(r"sab[ãa]o|detergente|desinfetante|[áa]gua sanit[áa]ria|papel higi[êe]nico|esponja", Category::Limpeza),
        CategoryRule::new(r"arroz|feij[ãa]o|macarr[ãa]o|farinha|a[çc][úu]car|\bsal\b|[óo]leo|azeite|tempero|molho", Category::Alimentos),
        CategoryRule::new(r"[áa]gua|suco|refrigerante|cerveja|vinho|caf[ée]|\bch[áa]\b|leite", Category::Bebidas),
        CategoryRule::new(r"sabonete|shampoo|condicionador|pasta de dente|escova|desodorante", Category::Higiene),
        CategoryRule::new(r"tomate|cebola|alho|batata|cenoura|alface|frutas|legumes", Category::Hortifruti),
        CategoryRule::new(r"p[ãa]o|bolo|biscoito|bolacha|torta|doce", Category::Padaria),
        CategoryRule::new(r"carne|frango|peixe|porco|bacon|lingui[çc]a|salsicha", Category::Carnes),
        CategoryRule::new(r"queijo|iogurte|manteiga|requeij[ãa]o|cream cheese", Category::Laticinios),
    ]
}

lazy_static! {
    static ref DEFAULT_CATEGORIZER: Categorizer = Categorizer::from_rules(&default_category_rules())
        .expect("built-in category patterns are valid");
}

/// Compiled, ordered category rules.
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<(Regex, Category)>,
}

impl Categorizer {
    /// Compile rules; patterns are matched case-insensitively.
    pub fn from_rules(rules: &[CategoryRule]) -> crate::Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| -> crate::Result<_> {
                let regex = RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()?;
                Ok((regex, rule.category))
            })
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Category of the first matching rule, `Outros` when none match.
    pub fn categorize(&self, product_name: &str) -> Category {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(product_name))
            .map(|(_, category)| *category)
            .unwrap_or(Category::Outros)
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        DEFAULT_CATEGORIZER.clone()
    }
}

/// Categorize with the built-in rules.
pub fn categorize(product_name: &str) -> Category {
    DEFAULT_CATEGORIZER.categorize(product_name)
}

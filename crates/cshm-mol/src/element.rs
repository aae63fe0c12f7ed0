//! Chemical elements
//!
//! Elements are identified by atomic number. Only the properties the
//! coordination analysis needs are tabulated: symbols for lookup and
//! labeling, and the metal classification used to sanity-check centers.

use ahash::AHashMap;
use std::fmt;
use std::sync::OnceLock;

/// Symbols indexed by atomic number (index 0 is a dummy atom)
static SYMBOLS: [&str; 119] = [
    "X", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", // 0-10
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca", // 11-20
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", // 21-30
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", // 31-40
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", // 41-50
    "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", // 51-60
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", // 61-70
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", // 71-80
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", // 81-90
    "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", // 91-100
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", // 101-110
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og", // 111-118
];

static SYMBOL_MAP: OnceLock<AHashMap<&'static str, Element>> = OnceLock::new();

fn symbol_map() -> &'static AHashMap<&'static str, Element> {
    SYMBOL_MAP.get_or_init(|| {
        let mut map = AHashMap::with_capacity(SYMBOLS.len() + 1);
        for (n, symbol) in SYMBOLS.iter().enumerate().skip(1) {
            map.insert(*symbol, Element(n as u8));
        }
        map.insert("D", Element::HYDROGEN);
        map
    })
}

/// Chemical element, stored as its atomic number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Element(u8);

impl Element {
    pub const DUMMY: Element = Element(0);
    pub const HYDROGEN: Element = Element(1);
    pub const CARBON: Element = Element(6);
    pub const NITROGEN: Element = Element(7);
    pub const OXYGEN: Element = Element(8);
    pub const PHOSPHORUS: Element = Element(15);
    pub const SULFUR: Element = Element(16);
    pub const CHLORINE: Element = Element(17);
    pub const IRON: Element = Element(26);
    pub const COBALT: Element = Element(27);
    pub const RUTHENIUM: Element = Element(44);
    pub const URANIUM: Element = Element(92);

    /// `None` above oganesson
    pub fn from_atomic_number(n: u8) -> Option<Self> {
        ((n as usize) < SYMBOLS.len()).then_some(Element(n))
    }

    /// Case-insensitive symbol lookup ("fe", "FE" and "Fe" all give iron)
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let symbol = symbol.trim();
        let mut chars = symbol.chars();
        let first = chars.next()?;
        let titlecase: String = std::iter::once(first.to_ascii_uppercase())
            .chain(chars.map(|c| c.to_ascii_lowercase()))
            .collect();
        symbol_map().get(titlecase.as_str()).copied()
    }

    #[inline]
    pub const fn atomic_number(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn symbol(&self) -> &'static str {
        SYMBOLS[self.0 as usize]
    }

    /// Alkali, alkaline-earth, transition, post-transition metals and f-block
    pub fn is_metal(&self) -> bool {
        let n = self.0;
        matches!(n, 3 | 4 | 11 | 12 | 19 | 20 | 37 | 38 | 55 | 56 | 87 | 88)
            || (21..=30).contains(&n)
            || (39..=48).contains(&n)
            || (57..=80).contains(&n)
            || (89..=112).contains(&n)
            || matches!(n, 13 | 31 | 49 | 50 | 81 | 82 | 83 | 113 | 114 | 115 | 116)
    }

    #[inline]
    pub fn is_carbon(&self) -> bool {
        *self == Element::CARBON
    }

    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        *self == Element::HYDROGEN
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Hill-order formula of a set of elements: C first, then H, then alphabetical
/// (alphabetical throughout when there is no carbon). Counts of one are omitted.
pub fn hill_formula(elements: impl IntoIterator<Item = Element>) -> String {
    let mut counts: AHashMap<Element, usize> = AHashMap::new();
    for e in elements {
        *counts.entry(e).or_default() += 1;
    }
    let has_carbon = counts.contains_key(&Element::CARBON);
    let mut keys: Vec<Element> = counts.keys().copied().collect();
    keys.sort_by_key(|e| {
        let rank = match (*e, has_carbon) {
            (Element::CARBON, true) => 0,
            (Element::HYDROGEN, true) => 1,
            _ => 2,
        };
        (rank, e.symbol())
    });

    let mut formula = String::new();
    for e in keys {
        formula.push_str(e.symbol());
        let n = counts[&e];
        if n > 1 {
            formula.push_str(&n.to_string());
        }
    }
    formula
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_symbol() {
        assert_eq!(Element::from_symbol("Fe"), Some(Element::IRON));
        assert_eq!(Element::from_symbol("FE"), Some(Element::IRON));
        assert_eq!(Element::from_symbol(" c "), Some(Element::CARBON));
        assert_eq!(Element::from_symbol("D"), Some(Element::HYDROGEN));
        assert_eq!(Element::from_symbol("Xx"), None);
        assert_eq!(Element::from_symbol(""), None);
    }

    #[test]
    fn test_atomic_number_round_trip() {
        let ru = Element::from_atomic_number(44).unwrap();
        assert_eq!(ru, Element::RUTHENIUM);
        assert_eq!(ru.symbol(), "Ru");
        assert_eq!(Element::from_atomic_number(118).map(|e| e.symbol()), Some("Og"));
        assert!(Element::from_atomic_number(119).is_none());
    }

    #[test]
    fn test_metal_classification() {
        assert!(Element::IRON.is_metal());
        assert!(Element::URANIUM.is_metal());
        assert!(Element::from_symbol("Sn").unwrap().is_metal());
        assert!(!Element::CARBON.is_metal());
        assert!(!Element::CHLORINE.is_metal());
    }

    #[test]
    fn test_hill_formula() {
        let pyrrolyl = [Element::CARBON, Element::CARBON, Element::NITROGEN, Element::CARBON, Element::CARBON];
        assert_eq!(hill_formula(pyrrolyl), "C4N");
        assert_eq!(hill_formula([Element::SULFUR, Element::NITROGEN, Element::NITROGEN]), "N2S");
        assert_eq!(format!("{}", Element::COBALT), "Co");
    }
}

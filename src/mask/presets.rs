//! Masks for the Brazilian form fields the registry knows by name.

use super::{CurrencyFormat, Mask, MaskParseError, PatternSet};
use serde::Deserialize;

pub const CNPJ: &str = "##.###.###/####-##";
pub const CPF: &str = "###.###.###-##";
pub const PHONE_LANDLINE: &str = "(##) ####-####";
pub const PHONE_MOBILE: &str = "(##) #####-####";
pub const CEP: &str = "#####-###";
pub const PLATE_LEGACY: &str = "AAA-####";
pub const PLATE_MERCOSUL: &str = "AAA#A##";
pub const YEAR: &str = "####";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Cnpj,
    Cpf,
    Phone,
    Cep,
    Plate,
    Year,
    Currency,
}

impl Preset {
    pub const ALL: [Preset; 7] = [
        Preset::Cnpj,
        Preset::Cpf,
        Preset::Phone,
        Preset::Cep,
        Preset::Plate,
        Preset::Year,
        Preset::Currency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Cnpj => "cnpj",
            Self::Cpf => "cpf",
            Self::Phone => "phone",
            Self::Cep => "cep",
            Self::Plate => "plate",
            Self::Year => "year",
            Self::Currency => "currency",
        }
    }

    pub fn pattern_set(self) -> Result<Option<PatternSet>, MaskParseError> {
        let set = match self {
            Self::Cnpj => PatternSet::parse(&[CNPJ])?,
            Self::Cpf => PatternSet::parse(&[CPF])?,
            Self::Phone => PatternSet::parse(&[PHONE_LANDLINE, PHONE_MOBILE])?,
            Self::Cep => PatternSet::parse(&[CEP])?,
            Self::Plate => PatternSet::parse(&[PLATE_LEGACY, PLATE_MERCOSUL])?.uppercased(),
            Self::Year => PatternSet::parse(&[YEAR])?,
            Self::Currency => return Ok(None),
        };
        Ok(Some(set))
    }

    pub fn mask(self) -> Mask {
        match self.pattern_set().expect("preset masks are valid") {
            Some(set) => Mask::Pattern(set),
            None => Mask::Currency(CurrencyFormat::brl()),
        }
    }
}

pub fn cnpj() -> Mask {
    Preset::Cnpj.mask()
}

pub fn cpf() -> Mask {
    Preset::Cpf.mask()
}

/// Landline `(99) 9999-9999` or mobile `(99) 99999-9999`, whichever the
/// digit count fits.
pub fn phone() -> Mask {
    Preset::Phone.mask()
}

pub fn cep() -> Mask {
    Preset::Cep.mask()
}

/// Legacy `AAA-9999` or Mercosul `AAA9A99` plates, upper-cased.
pub fn plate() -> Mask {
    Preset::Plate.mask()
}

pub fn year() -> Mask {
    Preset::Year.mask()
}

pub fn currency() -> Mask {
    Preset::Currency.mask()
}

#[cfg(test)]
mod tests {
    use super::{Preset, cep, cnpj, phone, plate, year};

    #[test]
    fn every_preset_parses() {
        for preset in Preset::ALL {
            assert!(preset.pattern_set().is_ok(), "{} failed", preset.name());
        }
    }

    #[test]
    fn preset_capacities() {
        assert_eq!(cnpj().capacity(), 14);
        assert_eq!(Preset::Cpf.mask().capacity(), 11);
        assert_eq!(phone().capacity(), 11);
        assert_eq!(cep().capacity(), 8);
        assert_eq!(plate().capacity(), 7);
        assert_eq!(year().capacity(), 4);
        assert_eq!(Preset::Currency.mask().capacity(), 11);
    }

    #[test]
    fn plate_reads_lowercase_input() {
        assert_eq!(plate().format("abc1234").text, "ABC-1234");
        assert_eq!(plate().format("abc1d23").text, "ABC1D23");
    }

    #[test]
    fn year_drops_letters() {
        assert_eq!(year().format("2O24x").text, "224");
    }
}

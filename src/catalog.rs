use crate::countries::CountryTable;
use crate::indicators::IndicatorTable;
use crate::models::Frequency;

/// Lookup tables needed to turn names into query codes.
///
/// Built once when the client is opened and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    countries: CountryTable,
    annual: IndicatorTable,
    sub_annual: IndicatorTable,
}

impl Catalog {
    pub fn new(
        countries: CountryTable,
        annual: IndicatorTable,
        sub_annual: IndicatorTable,
    ) -> Self {
        Self {
            countries,
            annual,
            sub_annual,
        }
    }

    pub fn countries(&self) -> &CountryTable {
        &self.countries
    }

    pub fn indicators(&self, frequency: Frequency) -> &IndicatorTable {
        match frequency {
            Frequency::Annual => &self.annual,
            Frequency::SubAnnual => &self.sub_annual,
        }
    }

    pub(crate) fn set_indicators(&mut self, frequency: Frequency, table: IndicatorTable) {
        match frequency {
            Frequency::Annual => self.annual = table,
            Frequency::SubAnnual => self.sub_annual = table,
        }
    }

    /// Resolve indicator names for `frequency`; see [`IndicatorTable::resolve_indexes`].
    pub fn resolve_indexes<S: AsRef<str>>(&self, frequency: Frequency, names: &[S]) -> Vec<u32> {
        self.indicators(frequency).resolve_indexes(names)
    }
}

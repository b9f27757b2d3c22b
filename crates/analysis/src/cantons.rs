//! Static registry of the 26 Swiss cantons.

pub struct Canton {
    pub code: &'static str,
    pub name: &'static str,
}

pub const CANTONS: &[Canton] = &[
    Canton { code: "zh", name: "Zürich" },
    Canton { code: "be", name: "Bern" },
    Canton { code: "lu", name: "Luzern" },
    Canton { code: "ur", name: "Uri" },
    Canton { code: "sz", name: "Schwyz" },
    Canton { code: "ow", name: "Obwalden" },
    Canton { code: "nw", name: "Nidwalden" },
    Canton { code: "gl", name: "Glarus" },
    Canton { code: "zg", name: "Zug" },
    Canton { code: "fr", name: "Fribourg" },
    Canton { code: "so", name: "Solothurn" },
    Canton { code: "bs", name: "Basel-Stadt" },
    Canton { code: "bl", name: "Basel-Landschaft" },
    Canton { code: "sh", name: "Schaffhausen" },
    Canton { code: "ar", name: "Appenzell Ausserrhoden" },
    Canton { code: "ai", name: "Appenzell Innerrhoden" },
    Canton { code: "sg", name: "St. Gallen" },
    Canton { code: "gr", name: "Graubünden" },
    Canton { code: "ag", name: "Aargau" },
    Canton { code: "tg", name: "Thurgau" },
    Canton { code: "ti", name: "Ticino" },
    Canton { code: "vd", name: "Vaud" },
    Canton { code: "vs", name: "Valais" },
    Canton { code: "ne", name: "Neuchâtel" },
    Canton { code: "ge", name: "Genève" },
    Canton { code: "ju", name: "Jura" },
];

/// Display name for a canton code, case-insensitive.
pub fn canton_name(code: &str) -> Option<&'static str> {
    CANTONS
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
        .map(|c| c.name)
}

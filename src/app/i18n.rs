use indexmap::IndexMap;
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Title,
    Temperature,
    Status,
    Consuming,
    Dumping,
    Inssuficient,
    Production,
    Consumption,
    Meter,
    Loading,
    AuthError,
}

impl Key {
    pub fn as_str(self) -> &'static str {
        match self {
            Key::Title => "TITLE",
            Key::Temperature => "TEMPERATURE",
            Key::Status => "STATUS",
            Key::Consuming => "CONSUMING",
            Key::Dumping => "DUMPING",
            Key::Inssuficient => "INSSUFICIENT",
            Key::Production => "PRODUCTION",
            Key::Consumption => "CONSUMPTION",
            Key::Meter => "METER",
            Key::Loading => "LOADING",
            Key::AuthError => "AUTH_ERROR",
        }
    }
}

const EN: &[(Key, &str)] = &[
    (Key::Title, "Solar inverter"),
    (Key::Temperature, "Temperature"),
    (Key::Status, "Status"),
    (Key::Consuming, "Consuming from grid"),
    (Key::Dumping, "Dumping to grid"),
    (Key::Inssuficient, "Insufficient production"),
    (Key::Production, "Production"),
    (Key::Consumption, "Consumption"),
    (Key::Meter, "Meter"),
    (Key::Loading, "Loading..."),
    (Key::AuthError, "Not authorized by the inverter server"),
];

const ES: &[(Key, &str)] = &[
    (Key::Title, "Inversor solar"),
    (Key::Temperature, "Temperatura"),
    (Key::Status, "Estado"),
    (Key::Consuming, "Consumiendo de la red"),
    (Key::Dumping, "Vertiendo a la red"),
    (Key::Inssuficient, "Producción insuficiente"),
    (Key::Production, "Producción"),
    (Key::Consumption, "Consumo"),
    (Key::Meter, "Contador"),
    (Key::Loading, "Cargando..."),
    (Key::AuthError, "El servidor del inversor no autoriza el acceso"),
];

pub struct Translator {
    strings: IndexMap<Key, &'static str>,
    fallback: IndexMap<Key, &'static str>,
}

impl Translator {
    pub fn new(language: &str) -> Self {
        let table = match language {
            "en" => EN,
            "es" => ES,
            other => {
                warn!("No translations for language {other:?}, using English");
                EN
            }
        };
        Self {
            strings: table.iter().copied().collect(),
            fallback: EN.iter().copied().collect(),
        }
    }

    pub fn translate(&self, key: Key) -> &'static str {
        self.strings
            .get(&key)
            .or_else(|| self.fallback.get(&key))
            .copied()
            .unwrap_or(key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spanish_lookup() {
        let t = Translator::new("es");
        assert_eq!(t.translate(Key::Meter), "Contador");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let t = Translator::new("fr");
        assert_eq!(t.translate(Key::Status), "Status");
    }

    #[test]
    fn test_every_key_has_english_text() {
        let t = Translator::new("en");
        for (key, _) in EN {
            assert_ne!(t.translate(*key), key.as_str());
        }
        assert_eq!(EN.len(), ES.len());
    }
}

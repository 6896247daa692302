//! Turns a telemetry snapshot into plain view models.
//!
//! Nothing in here touches the terminal, [`super::widgets`] draws the result.

use crate::{
    app::{
        config::{AppConfig, GradientPair},
        i18n::{Key, Translator},
    },
    cmd::telemetry::Telemetry,
    mapper::{self, BarMode, Range, Rgb},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Large,
    Normal,
}

/// How one metric is laid out on the dashboard.
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub key: Key,
    pub unit: &'static str,
    pub mode: BarMode,
    pub show_title: bool,
    pub size: Size,
}

/// Where the filled segment sits, in percent of the bar width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub offset_percent: f64,
    pub fill_percent: f64,
    /// Position of zero on two-sided bars.
    pub zero_percent: Option<f64>,
    /// The fill grows leftwards from zero.
    pub inverse: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeterView {
    pub label: String,
    pub color: Rgb,
    pub warning: bool,
    pub size: Size,
    pub bar: BarGeometry,
}

impl MeterView {
    pub fn build(
        spec: &MetricSpec,
        reading: f64,
        range: &Range,
        gradients: &GradientPair,
        translator: &Translator,
    ) -> Self {
        let mapped = mapper::map(reading, range, &gradients.positive, &gradients.negative);
        let fill = mapped.fill_percent(spec.mode);

        let bar = match spec.mode {
            BarMode::OneSided => BarGeometry {
                offset_percent: 0.0,
                fill_percent: fill,
                zero_percent: None,
                inverse: false,
            },
            BarMode::TwoSided => {
                let zero = 100.0 - mapped.anchor_percent;
                BarGeometry {
                    offset_percent: if mapped.negative { zero - fill } else { zero },
                    fill_percent: fill,
                    zero_percent: Some(zero),
                    inverse: mapped.negative,
                }
            }
        };

        let label = if spec.show_title {
            format!("{}: {} {}", translator.translate(spec.key), reading, spec.unit)
        } else {
            format!("{} {}", reading, spec.unit)
        };

        Self {
            label,
            color: mapped.rgb,
            warning: mapped.out_of_range,
            size: spec.size,
            bar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    Dumping,
    Inssuficient,
    Consuming,
}

impl SystemStatus {
    pub fn derive(meter: f64, production: f64, with_insufficient: bool) -> Self {
        if meter >= 0.0 {
            SystemStatus::Dumping
        } else if production > 0.0 && with_insufficient {
            SystemStatus::Inssuficient
        } else {
            SystemStatus::Consuming
        }
    }

    pub fn key(self) -> Key {
        match self {
            SystemStatus::Dumping => Key::Dumping,
            SystemStatus::Inssuficient => Key::Inssuficient,
            SystemStatus::Consuming => Key::Consuming,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Positive,
    Negative,
    Off,
}

/// Solar -> home -> grid strip shown above the meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowView {
    pub solar: FlowState,
    pub solar_home: FlowState,
    pub home: FlowState,
    pub home_grid: FlowState,
    pub grid: FlowState,
}

impl FlowView {
    pub fn from_telemetry(t: &Telemetry) -> Self {
        let producing = t.production > 0.0;
        let importing = t.meter < 0.0;
        Self {
            solar: if producing { FlowState::Positive } else { FlowState::Off },
            solar_home: if producing { FlowState::Positive } else { FlowState::Off },
            home: if t.meter > 0.0 { FlowState::Positive } else { FlowState::Negative },
            home_grid: if importing { FlowState::Negative } else { FlowState::Positive },
            grid: if importing { FlowState::Negative } else { FlowState::Off },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub status: SystemStatus,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub title: Option<String>,
    pub error: Option<String>,
    pub loading: Option<String>,
    pub flow: Option<FlowView>,
    pub meters: Vec<MeterView>,
    pub status: Option<StatusView>,
}

pub const METER: MetricSpec = MetricSpec {
    key: Key::Meter,
    unit: "Wh",
    mode: BarMode::TwoSided,
    show_title: false,
    size: Size::Large,
};
pub const PRODUCTION: MetricSpec = MetricSpec {
    key: Key::Production,
    unit: "Wh",
    mode: BarMode::OneSided,
    show_title: true,
    size: Size::Normal,
};
pub const CONSUMPTION: MetricSpec = MetricSpec {
    key: Key::Consumption,
    unit: "Wh",
    mode: BarMode::OneSided,
    show_title: true,
    size: Size::Normal,
};
pub const TEMPERATURE: MetricSpec = MetricSpec {
    key: Key::Temperature,
    unit: "ºC",
    mode: BarMode::OneSided,
    show_title: true,
    size: Size::Normal,
};

impl DashboardView {
    pub fn build(
        config: &AppConfig,
        translator: &Translator,
        snapshot: Option<&Telemetry>,
        auth_failed: bool,
    ) -> Self {
        let title = config.show_title.then(|| translator.translate(Key::Title).to_string());
        let error = auth_failed.then(|| translator.translate(Key::AuthError).to_string());

        let Some(t) = snapshot else {
            return Self {
                title,
                error,
                loading: Some(translator.translate(Key::Loading).to_string()),
                flow: None,
                meters: Vec::new(),
                status: None,
            };
        };

        let palette = &config.palette;
        let meter_spec = MetricSpec { show_title: config.show_meter_title, ..METER };
        let mut meters = vec![
            MeterView::build(&meter_spec, t.meter, &config.power_range, &palette.power, translator),
            MeterView::build(&PRODUCTION, t.production, &config.power_range, &palette.power, translator),
            MeterView::build(
                &CONSUMPTION,
                t.consumption,
                &config.power_range,
                &palette.consumption,
                translator,
            ),
        ];
        if config.show_temperature {
            meters.push(MeterView::build(
                &TEMPERATURE,
                t.temperature,
                &config.temperature_range,
                &palette.temperature,
                translator,
            ));
        }

        let status = SystemStatus::derive(t.meter, t.production, config.show_insufficient_status);
        Self {
            title,
            error,
            loading: None,
            flow: Some(FlowView::from_telemetry(t)),
            meters,
            status: Some(StatusView {
                status,
                label: translator.translate(Key::Status).to_string(),
                value: translator.translate(status.key()).to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(production: f64, meter: f64) -> Telemetry {
        Telemetry { production, consumption: 600.0, meter, temperature: 35.0 }
    }

    #[test]
    fn test_status_table() {
        assert_eq!(SystemStatus::derive(100.0, 900.0, true), SystemStatus::Dumping);
        assert_eq!(SystemStatus::derive(0.0, 0.0, true), SystemStatus::Dumping);
        assert_eq!(SystemStatus::derive(-100.0, 900.0, true), SystemStatus::Inssuficient);
        assert_eq!(SystemStatus::derive(-100.0, 900.0, false), SystemStatus::Consuming);
        assert_eq!(SystemStatus::derive(-100.0, 0.0, true), SystemStatus::Consuming);
    }

    #[test]
    fn test_flow_when_importing_at_night() {
        let flow = FlowView::from_telemetry(&snapshot(0.0, -300.0));
        assert_eq!(flow.solar, FlowState::Off);
        assert_eq!(flow.solar_home, FlowState::Off);
        assert_eq!(flow.home, FlowState::Negative);
        assert_eq!(flow.home_grid, FlowState::Negative);
        assert_eq!(flow.grid, FlowState::Negative);
    }

    #[test]
    fn test_flow_when_exporting() {
        let flow = FlowView::from_telemetry(&snapshot(2000.0, 800.0));
        assert_eq!(flow.solar, FlowState::Positive);
        assert_eq!(flow.home, FlowState::Positive);
        assert_eq!(flow.home_grid, FlowState::Positive);
        assert_eq!(flow.grid, FlowState::Off);
    }

    #[test]
    fn test_two_sided_geometry() {
        let config = AppConfig::default();
        let t = Translator::new("en");
        let neg = MeterView::build(&METER, -2500.0, &config.power_range, &config.palette.power, &t);
        let zero = 2500.0 / 4700.0 * 100.0;
        assert!(neg.bar.inverse);
        assert!(neg.bar.offset_percent.abs() < 1e-9);
        assert!((neg.bar.fill_percent - zero).abs() < 1e-9);
        assert_eq!(neg.label, "-2500 Wh");

        let pos = MeterView::build(&METER, 1100.0, &config.power_range, &config.palette.power, &t);
        assert!(!pos.bar.inverse);
        assert!((pos.bar.offset_percent - zero).abs() < 1e-9);
        assert!((pos.bar.offset_percent + pos.bar.fill_percent - (zero + (100.0 - zero) / 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_loading_until_first_snapshot() {
        let config = AppConfig::default();
        let view = DashboardView::build(&config, &Translator::new("en"), None, false);
        assert_eq!(view.loading.as_deref(), Some("Loading..."));
        assert!(view.meters.is_empty());
        assert!(view.status.is_none());
    }

    #[test]
    fn test_temperature_toggle_and_auth_error() {
        let mut config = AppConfig::default();
        let t = Translator::new("en");
        let s = snapshot(1000.0, 200.0);

        let view = DashboardView::build(&config, &t, Some(&s), true);
        assert_eq!(view.meters.len(), 4);
        assert_eq!(view.meters[3].label, "Temperature: 35 ºC");
        assert!(view.error.is_some());

        config.show_temperature = false;
        let view = DashboardView::build(&config, &t, Some(&s), false);
        assert_eq!(view.meters.len(), 3);
        assert_eq!(view.meters[1].label, "Production: 1000 Wh");
        assert!(view.error.is_none());
    }
}

use axum::{extract::State, response::IntoResponse};
use axum_template::{Key, RenderHtml};
use iqr_calculator::{Config, QuartileMethod};
use serde::Serialize;

use crate::AppEngine;

#[derive(Serialize)]
struct MethodItem {
    value: &'static str,
    description: &'static str,
    selected: bool,
}

#[derive(Serialize)]
struct Model {
    methods: Vec<MethodItem>,
    sample_values: String,
    precision: usize,
    random_count: usize,
}

fn model(config: &Config) -> Model {
    Model {
        methods: QuartileMethod::ALL
            .into_iter()
            .map(|m| MethodItem {
                value: m.name(),
                description: m.description(),
                selected: m == config.default_method,
            })
            .collect(),
        sample_values: config.sample_values.clone(),
        precision: config.precision,
        random_count: config.random.count,
    }
}

pub(crate) async fn handle_calc(
    State(engine): State<AppEngine>,
    State(config): State<Config>,
) -> impl IntoResponse {
    RenderHtml(Key("calc".to_owned()), engine, model(&config))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_method_is_selected() {
        let m = model(&Config::default());
        assert_eq!(m.methods.len(), QuartileMethod::ALL.len());
        let selected: Vec<_> = m.methods.iter().filter(|m| m.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "exclusive-halves");
    }

    #[test]
    fn page_renders() {
        let mut env = minijinja::Environment::new();
        env.add_template("calc", include_str!("../wwwroot/html/calc.html"))
            .unwrap();
        let html = env
            .get_template("calc")
            .unwrap()
            .render(model(&Config::default()))
            .unwrap();
        assert!(html.contains("12 15 18 22 25 28 32 35 100"));
        assert!(html.contains("value=\"rank-midpoint\""));
    }
}

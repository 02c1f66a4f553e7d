use std::collections::HashMap;

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::IntoResponse,
};

use maplit::hashmap;

use mime_guess::mime;

use crate::handlers::into_body::IntoBody;

lazy_static::lazy_static! {
    static ref STATIC_DATA: HashMap<&'static str, &'static str> = hashmap! {
        "site.css" => include_str!("wwwroot/css/site.css"),
        "calc.js" => include_str!("wwwroot/js/calc.js"),
    };
}

/// Handle embedded css and js
pub(crate) async fn handle_static(Path(file): Path<String>) -> impl IntoResponse {
    STATIC_DATA
        .get(file.as_str())
        .map_or(StatusCode::NOT_FOUND.into_response(), |data| {
            let mime_type = mime_guess::from_path(&file).first_or(mime::TEXT_PLAIN_UTF_8);
            let headers = [(header::CONTENT_TYPE, mime_type.to_string())];
            (headers, data.into_body()).into_response()
        })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn assets_are_embedded() {
        assert!(STATIC_DATA["calc.js"].contains("/api/stats"));
        // generated samples go to the engine unrounded
        assert!(STATIC_DATA["calc.js"].contains("r.Values.join(\" \")"));
        assert!(!STATIC_DATA["site.css"].is_empty());
        assert!(!STATIC_DATA.contains_key("calc.html"));
    }
}

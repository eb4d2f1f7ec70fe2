use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="da" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style {
                    "body { font-family: system-ui, sans-serif; max-width: 720px; margin: 3rem auto; padding: 1rem; }"
                    "label { display: block; margin: 0.5rem 0; }"
                    "fieldset { border: 1px solid #ddd; border-radius: 6px; margin: 1rem 0; }"
                }
            }
            body {
                header {
                    h3 { a href="/" { "Bopælsattest" } }
                }
                (content)
            }
        }
    }
}

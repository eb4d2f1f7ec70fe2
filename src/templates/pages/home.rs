// templates/pages/home.rs

use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Form that requests a certificate from `/certificate`.
pub fn home_page() -> Markup {
    desktop_layout(
        "Bopælsattest",
        html! {
            h1 { "Opret bopælsattest" }

            form method="get" action="/certificate" {
                label {
                    "CPR-nummer "
                    input type="text" name="cpr" required pattern="[0-9]{6}-?[0-9]{4}" placeholder="ddmmåå-xxxx";
                }
                label {
                    "Adressehistorik fra "
                    input type="date" name="from" value="2015-01-01";
                }

                fieldset {
                    legend { "Medtag" }
                    label { input type="checkbox" name="name_history" checked; " Navnehistorik" }
                    label { input type="checkbox" name="citizenship" checked; " Statsborgerskab" }
                    label { input type="checkbox" name="civil_status" checked; " Civilstand" }
                    label { input type="checkbox" name="children" checked; " Børn på adressen" }
                }

                button type="submit" { "Hent attest" }
            }
        },
    )
}

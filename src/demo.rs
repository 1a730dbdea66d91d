//! Demo route set served by the `burrow` binary.
//!
//! | Method | Pattern                  | Response                        |
//! |--------|--------------------------|---------------------------------|
//! | GET    | `/`                      | `index` view                    |
//! | POST   | `/submit`                | `Form data received: <body>`    |
//! | GET    | `/json`                  | JSON message                    |
//! | GET    | `/about`                 | `This is the about page.`       |
//! | GET    | `/increment/{number}`    | `Incremented number: <n + 1>`   |
//! | GET    | `/greet/{entity}/{name}` | `Hello <name>, the <entity>!`   |

use serde::Serialize;

use crate::error::ServeError;
use crate::http::{Json, Text};
use crate::routing::RouteTable;
use crate::templates::{ViewModel, ViewRenderer};

#[derive(Serialize)]
struct Message {
    message: &'static str,
}

pub fn routes(views: ViewRenderer) -> Result<RouteTable, ServeError> {
    let table = RouteTable::builder()
        .get("/", move |_| {
            let model = ViewModel::new()
                .with("Firstname", "Bill")
                .with("Lastname", "Gates")
                .with("Something", "Something else");
            Ok(views.render(&model, "index")?)
        })?
        .post("/submit", |args| {
            Ok(Text::new(format!("Form data received: {}", args.request()?.body)))
        })?
        .get("/json", |_| {
            Ok(Json::from_serialize(&Message {
                message: "This is a JSON response",
            })?)
        })?
        .get("/about", |_| Ok(Text::new("This is the about page.")))?
        .get("/increment/{number}", |args| {
            let n: i64 = args.param(0)?.parse()?;
            Ok(Text::new(format!("Incremented number: {}", n + 1)))
        })?
        .get("/greet/{entity}/{name}", |args| {
            Ok(Text::new(format!("Hello {}, the {}!", args.param(1)?, args.param(0)?)))
        })?
        .build();

    Ok(table)
}

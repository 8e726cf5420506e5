//! Tables and detail lists rendered for a request with filters

use std::sync::Arc;

use regalia_common::{Attributes, Catalog, PlainRecord, Record};
use regalia_format::{FieldKindRegistry, FormatConfig, ModelDef, ValueFormatter};
use regalia_list::{ColumnOptions, Link, ListHelper, RequestParams, ShowOptions, TableOptions};
use serde_json::json;
use test_log::test;

const EN: &str = r#"
en:
  activerecord:
    attributes:
      user:
        name: Full name
        balance: Balance
  link:
    edit: Edit
"#;

fn formatter() -> ValueFormatter {
    let registry = FieldKindRegistry::new()
        .with_model(ModelDef::new("User").money_fields(&["balance"]))
        .unwrap();
    let mut catalog = Catalog::new("en");
    catalog.load_yaml_str(EN).unwrap();
    ValueFormatter::new(Arc::new(registry), Arc::new(catalog), FormatConfig::default())
}

fn users() -> Vec<PlainRecord> {
    vec![
        PlainRecord::new("User")
            .with("id", 1)
            .with("name", "Tina")
            .with("email", "tina@example.com")
            .with("balance", 10),
        PlainRecord::new("User")
            .with("id", 2)
            .with("name", "Tom")
            .with("email", "")
            .with("balance", 0),
    ]
}

fn request() -> RequestParams {
    RequestParams::new("/users")
        .param("controller", "users")
        .param("filter", json!({"letter": "T"}))
        .param("sort", "ASC")
        .param("sort_by", "users.name")
}

#[test]
fn test_sort_links_keep_filters() {
    let formatter = formatter();
    let helper = ListHelper::new(&formatter, request());
    let users = users();

    let html = helper
        .table_for(&users, &TableOptions::default(), &Attributes::new(), |t, user| {
            let href = format!("/users/{}", user.id().unwrap_or_default());
            let mut cells = t.column("name", ColumnOptions::new().link(Link::To(href)));
            cells += &t.column("email", ColumnOptions::new());
            cells += &t.column("balance", ColumnOptions::new().class("right").sorting(false));
            cells += &t.action_column(&Attributes::new(), || {
                Ok(helper.action_icon(
                    "edit",
                    &format!("/users/{}/edit", user.id().unwrap_or_default()),
                    &Attributes::new(),
                    &Attributes::new(),
                ))
            })?;
            Ok(cells)
        })
        .unwrap();

    // the active column flips to descending and keeps the filter
    assert!(html.contains(
        "<th class=\"sortup first\"><a href=\"/users?filter%5Bletter%5D=T\
         &amp;sort=DESC&amp;sort_by=users.name\">Full name</a></th>"
    ));
    assert!(html.contains(
        "<th><a href=\"/users?filter%5Bletter%5D=T&amp;sort=DESC&amp;sort_by=users.email\">Email</a></th>"
    ));
    assert!(!html.contains("controller"));
    assert!(html.contains("<th class=\"right\">Balance</th>"));
    assert!(html.contains("<th class=\"last\" align=\"left\">Actions</th>"));
    assert_eq!(html.matches("</th>").count(), 4);

    assert!(html.contains("<td><a href=\"/users/1\">Tina</a></td>"));
    assert!(html.contains("<td class=\"right\">$10.00</td>"));
    assert!(html.contains(
        "<td class=\"actions\"><ul class=\"actions\">\
         <li class=\"icon edit\" title=\"Edit\"><a href=\"/users/2/edit\"><span>edit</span></a></li>\
         </ul></td>"
    ));
    assert_eq!(html.matches("<tr>").count(), 3);
}

#[test]
fn test_detail_list_next_to_actions() {
    let formatter = formatter();
    let helper = ListHelper::new(&formatter, request());
    let users = users();
    let user = &users[1];

    let html = helper
        .dl_for("user", Some(user), &Attributes::new(), |f| {
            let mut out = f.show("name", ShowOptions::new());
            out += &f.show("email", ShowOptions::new());
            out += &f.show("balance", ShowOptions::new().dd(Attributes::new().with_class("right")));
            Ok(out)
        })
        .unwrap();
    assert_eq!(
        html,
        "<dl><dt>Full name</dt><dd>Tom</dd><dt>Email</dt><dd>&nbsp;</dd>\
         <dt>Balance</dt><dd class=\"right\">$0.00</dd></dl>"
    );
}

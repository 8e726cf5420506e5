//! Complete forms rendered through the public entry points

use std::sync::Arc;

use chrono::NaiveDate;
use regalia_common::{Attributes, Catalog, PlainRecord, Record};
use regalia_format::{FieldKindRegistry, FormatConfig, ModelDef, ValueFormatter};
use regalia_form::{
    dl_form_for, labeled_fields_for, Align, ChoiceSet, FieldOptions, FormMethod, FormSettings,
    NestedFormOptions, SectionOptions,
};
use test_log::test;

const DE: &str = r#"
de:
  date:
    order: [":day", ":month", ":year"]
    month_names: [~, Januar, Februar, März, April, Mai, Juni, Juli, August, September, Oktober, November, Dezember]
  activerecord:
    attributes:
      invoice:
        number: Rechnungsnummer
        number_info: Wird automatisch vergeben
        date: Datum
        total: Summe
      line_item:
        name: Bezeichnung
        price: Preis
        quantity: Menge
"#;

fn formatter() -> ValueFormatter {
    let registry = FieldKindRegistry::new()
        .with_model(
            ModelDef::new("Invoice")
                .money_fields(&["total"])
                .date_fields(&["date"])
                .column("number", 12)
                .accepts_nested_attributes_for("line_items"),
        )
        .unwrap()
        .with_model(ModelDef::new("LineItem").money_fields(&["price"]))
        .unwrap();
    let mut catalog = Catalog::new("de");
    catalog.load_yaml_str(DE).unwrap();
    ValueFormatter::new(Arc::new(registry), Arc::new(catalog), FormatConfig::default())
}

fn invoice() -> PlainRecord {
    PlainRecord::new("Invoice")
        .with("id", 5)
        .with("number", "R-2024-001")
        .with("date", NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        .with("total", 119)
}

#[test]
fn test_definition_list_form_with_sections_and_bundles() {
    let formatter = formatter();
    let invoice = invoice();
    let settings = FormSettings::new("/invoices/5")
        .method(FormMethod::parse("put"))
        .token("t0k3n");

    let html = dl_form_for(&formatter, "invoice", Some(&invoice), &settings, |f| {
        let mut out = f.section(Some("Rechnung"), &SectionOptions::default(), |f| {
            let mut fields = f.text("number", FieldOptions::new())?;
            fields += &f.date("date", FieldOptions::new())?;
            fields += &f.bundle("Summe und Status", &Attributes::new(), |f| {
                let mut inner = f.static_text("total", FieldOptions::new())?;
                inner += &f.selection(
                    "status",
                    FieldOptions::new().choices(ChoiceSet::flat(["open", "paid"])),
                )?;
                inner += &f.checkbox("locked", FieldOptions::new().no_info())?;
                Ok(inner)
            })?;
            Ok(fields)
        })?;
        out += &f.section(Some("Leer"), &SectionOptions::default(), |_| Ok(String::new()))?;
        out += &f.submit("Speichern", FieldOptions::new())?;
        Ok(out)
    })
    .unwrap();

    assert!(html.starts_with(
        "<form action=\"/invoices/5\" method=\"post\"><div>\
         <input type=\"hidden\" name=\"_method\" value=\"put\" />\
         <input type=\"hidden\" name=\"authenticity_token\" value=\"t0k3n\" /></div>\
         <fieldset><legend>Rechnung</legend><dl><dt>Rechnungsnummer</dt>"
    ));
    assert!(html.contains("maxlength=\"12\" size=\"12\""));
    assert!(html.contains("<div class=\"info\">Wird automatisch vergeben</div>"));

    // day, month and year selects in the configured order
    let day = html.find("invoice[date(3i)]").unwrap();
    let month = html.find("invoice[date(2i)]").unwrap();
    let year = html.find("invoice[date(1i)]").unwrap();
    assert!(day < month && month < year);
    assert!(html.contains("<option value=\"2\" selected=\"selected\">Februar</option>"));
    assert!(html.contains("<dd class=\"dates\">"));

    assert!(html.contains("<dt>Summe und Status</dt><dd class=\"elements_3\">$119.00"));
    assert!(!html.contains("Leer"));
    assert!(html.ends_with(
        "</dl></fieldset><span class=\"submit\">\
         <input type=\"submit\" name=\"commit\" value=\"Speichern\" /></span></form>"
    ));
}

#[test]
fn test_empty_bundle_counts_zero_elements() {
    let formatter = formatter();
    let html = labeled_fields_for(&formatter, "invoice", None, |f| {
        f.bundle("Nichts", &Attributes::new().with_class("muted"), |_| {
            Ok(String::new())
        })
    })
    .unwrap();
    assert_eq!(
        html,
        "<div class=\"elements_0\"><label class=\"muted\">Nichts</label></div>"
    );
}

#[test]
fn test_nested_line_items_as_table() {
    let formatter = formatter();
    let invoice = invoice();
    let mut items = vec![
        PlainRecord::new("LineItem")
            .with("id", 1)
            .with("name", "Papier")
            .with("price", 5)
            .with("quantity", 10),
        PlainRecord::new("LineItem")
            .with("id", 2)
            .with("name", "Tinte")
            .with("price", 20)
            .with("quantity", 1),
    ];

    let html = dl_form_for(
        &formatter,
        "invoice",
        Some(&invoice),
        &FormSettings::new("/invoices/5").method(FormMethod::Get),
        |f| {
            f.table("Positionen", &Attributes::new(), |f| {
                let mut rows = String::new();
                let count = items.len();
                for index in 0..count {
                    let skip: Vec<usize> = (0..count).filter(|i| *i != index).collect();
                    let opts = NestedFormOptions {
                        skip,
                        ..Default::default()
                    };
                    rows += &f.table_row(|f| {
                        f.render_nested_form(
                            &mut items,
                            &opts,
                            || PlainRecord::new_record("LineItem"),
                            |f, item| {
                                let mut cells = f.text("name", FieldOptions::new())?;
                                cells += &f.text("quantity", FieldOptions::new().align(Align::Center))?;
                                cells += &f.static_text("price", FieldOptions::new().align(Align::Right))?;
                                cells += &f.actions(&Attributes::new(), |_| {
                                    Ok(format!("<a href=\"/line_items/{}\">x</a>", item.id().unwrap_or_default()))
                                })?;
                                Ok(cells)
                            },
                        )
                    })?;
                }
                Ok(rows)
            })
        },
    )
    .unwrap();

    assert!(html.starts_with("<form action=\"/invoices/5\" method=\"get\"><table summary=\"Positionen\">"));
    assert!(html.contains(
        "<tr><th class=\"first\" align=\"left\">Bezeichnung</th>\
         <th align=\"center\">Menge</th>\
         <th class=\"last\" align=\"right\">Preis</th></tr>"
    ));
    assert!(html.contains("name=\"invoice[line_items_attributes][0][name]\" value=\"Papier\""));
    assert!(html.contains("name=\"invoice[line_items_attributes][1][name]\" value=\"Tinte\""));
    assert!(html.contains("<td class=\"right\" align=\"right\">$20.00</td>"));
    assert!(html.contains("<td class=\"actions\"><a href=\"/line_items/2\">x</a></td>"));
    assert!(html.contains(
        "<input type=\"hidden\" id=\"invoice_line_items_attributes_1_id\" \
         name=\"invoice[line_items_attributes][1][id]\" value=\"2\" />"
    ));
}

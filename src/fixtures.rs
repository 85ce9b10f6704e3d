// 🧪 Test Fixtures - German rule set and a default country
//
// Bank idents, rules and BICs below are made up for tests except the
// Commerzbank reference account DE89 3704 0044 0532 0130 00.

use crate::config::IbanConfig;
use crate::entities::{Country, CountryCode};
use crate::provider::StaticDataProvider;

pub const CONFIG_JSON: &str = r#"{
    "countries": [
        { "country_type": "DE", "name": "Germany", "format": "^DE\\d{20}$",
          "bank_ident_length": 8, "account_number_length": 10 },
        { "country_type": "AT", "name": "Austria", "format": "^AT\\d{18}$",
          "bank_ident_length": 5, "account_number_length": 11 }
    ],
    "banks": [
        { "bank_ident": "37040044", "name": "Commerzbank Koeln", "rule": "000000", "bic": "COBADEFFXXX" },
        { "bank_ident": "50010517", "name": "Testbank Frankfurt", "rule": "000100", "bic": "INGDDEFFXXX" },
        { "bank_ident": "17020000", "name": "Testbank Frankfurt (Oder)", "rule": "000200", "bic": "TESTDE81XXX" },
        { "bank_ident": "10020000", "name": "Testbank Berlin", "rule": "000300", "bic": "TESTDEB0XXX" },
        { "bank_ident": "10050000", "name": "Landesbank Berlin", "rule": "000000", "bic": "BELADEBEXXX" },
        { "bank_ident": "12030000", "name": "Testbank Potsdam Alt", "rule": "000400", "bic": "TESTDEB1XXX" },
        { "bank_ident": "12070000", "name": "Testbank Potsdam", "rule": "000000", "bic": "TESTDEBBXXX" },
        { "bank_ident": "20010020", "name": "Testbank Hamburg", "rule": "000500", "bic": "TESTDEHHXXX" },
        { "bank_ident": "20030000", "name": "Testbank Hamburg Neu", "rule": "000000", "bic": "HYVEDEMM300" },
        { "bank_ident": "30010000", "name": "Testbank Duesseldorf", "rule": "000600", "bic": "TESTDEDDXXX" },
        { "bank_ident": "37050198", "name": "Sparkasse KoelnBonn", "rule": "000700", "bic": "COLSDE33XXX" },
        { "bank_ident": "60050101", "name": "Testbank Stuttgart", "rule": "000800", "bic": "SOLADEST600" },
        { "bank_ident": "70020270", "name": "Testbank Muenchen", "rule": "000900", "bic": "TESTDEMMXXX" },
        { "bank_ident": "80020000", "name": "Testbank Halle", "rule": "000000" },
        { "bank_ident": "81000000", "name": "Testbank Magdeburg", "rule": "000990", "bic": "TESTDE81MAG" }
    ],
    "rules": [
        { "id": "000200", "elements": [
            { "type": "mappings_kto", "attributes": [["blz", "^17020000$"]], "children": [
                { "type": "mapping", "attributes": [["from", "^12345$"]], "data": "67890" }
            ] }
        ] },
        { "id": "000300", "elements": [
            { "type": "mappings_kto", "attributes": [["blz", "^10020000$"], ["blz_new", "10050000"]], "children": [
                { "type": "mapping", "attributes": [["from", "^9999$"]], "data": "5555555" }
            ] }
        ] },
        { "id": "000400", "elements": [
            { "type": "mappings_ktokr", "attributes": [["kto", "^\\d{7}$"]], "children": [
                { "type": "mapping", "attributes": [["from", "123"]], "data": "12070000" }
            ] }
        ] },
        { "id": "000500", "elements": [
            { "type": "mappings_blz", "children": [
                { "type": "mapping", "attributes": [["from", "^20010020$"]], "data": "20030000" }
            ] },
            { "type": "mappings_bic", "children": [
                { "type": "mapping", "attributes": [["blz", "^20010020$"]], "data": "TESTDEHH200" }
            ] }
        ] },
        { "id": "000600", "elements": [
            { "type": "modification_kto", "children": [
                { "type": "modification", "attributes": [["blz", "^30010000$"]], "data": "^(\\d{6})$;$100" }
            ] }
        ] },
        { "id": "000700", "elements": [
            { "type": "no_calculation", "children": [
                { "type": "kto_number_range", "attributes": [["blz", "^37050198$"]], "data": "^9\\d{6}$" }
            ] }
        ] },
        { "id": "000800", "elements": [
            { "type": "mappings_kto", "attributes": [["blz", "^60050101$"], ["blz_new", "99999999"]], "children": [
                { "type": "mapping", "attributes": [["from", "^1$"]], "data": "2" }
            ] }
        ] },
        { "id": "000900", "elements": [
            { "type": "mappings_blz", "children": [
                { "type": "mapping", "attributes": [["from", "^70020270$"]], "data": "20030000" }
            ] },
            { "type": "mappings_blz", "children": [
                { "type": "mapping", "attributes": [["from", "^70020270$"]], "data": "10050000" }
            ] }
        ] },
        { "id": "000990", "elements": [
            { "type": "mappings_blz", "children": [
                { "type": "mapping", "attributes": [["from", "^(8100"]], "data": "37040044" }
            ] }
        ] }
    ],
    "rule_countries": ["DE"]
}"#;

pub fn config() -> IbanConfig {
    IbanConfig::from_json_str(CONFIG_JSON).expect("fixture configuration")
}

pub fn provider() -> StaticDataProvider {
    StaticDataProvider::from_config(&config())
}

pub fn germany() -> Country {
    Country::new(
        CountryCode::DE,
        "Germany".to_string(),
        r"^DE\d{20}$".to_string(),
        8,
        10,
    )
}

pub fn austria() -> Country {
    Country::new(
        CountryCode::AT,
        "Austria".to_string(),
        r"^AT\d{18}$".to_string(),
        5,
        11,
    )
}

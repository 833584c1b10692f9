//! Behaviour of the preset masks as a form user sees it: formatting,
//! unmasking, overflow and caret placement.

use fieldmask::{Mask, MaskedField, PatternSet, format, presets, unmask};

fn type_text(field: &mut MaskedField, text: &str) {
    for ch in text.chars() {
        field.insert_char(ch);
    }
}

#[test]
fn unmask_recovers_every_digit_prefix() {
    let cases = [
        (presets::cnpj(), "12345678000195"),
        (presets::cpf(), "12345678901"),
        (presets::phone(), "11987654321"),
        (presets::cep(), "01310100"),
        (presets::year(), "2024"),
        (presets::currency(), "123456789"),
    ];

    for (mask, raw) in cases {
        for len in 0..=raw.len() {
            let prefix = &raw[..len];
            let formatted = format(prefix, &mask);
            assert_eq!(
                mask.unmask(formatted.text.as_str()),
                prefix,
                "prefix {prefix:?} formatted as {:?}",
                formatted.text
            );
        }
    }
}

#[test]
fn empty_input_formats_to_empty_text() {
    for preset in presets::Preset::ALL {
        let formatted = preset.mask().format("");
        assert_eq!(formatted.text, "", "preset {}", preset.name());
        assert_eq!(formatted.significant_count, 0);
    }
}

#[test]
fn fill_mode_shows_the_whole_template() {
    let set = PatternSet::parse(&[presets::CEP])
        .expect("cep")
        .with_placeholder('_')
        .expect("placeholder");
    let mask = Mask::Pattern(set);
    assert_eq!(mask.format("").text, "_____-___");
    assert_eq!(mask.format("").significant_count, 0);
    assert_eq!(mask.format("0131").text, "0131_-___");
}

#[test]
fn cnpj_overflow_keeps_the_first_fourteen_digits() {
    let formatted = presets::cnpj().format("12345678901234567890");
    assert_eq!(formatted.text, "12.345.678/9012-34");
    assert_eq!(formatted.significant_count, 14);
    assert!(formatted.is_complete());
}

#[test]
fn phone_switches_between_landline_and_mobile() {
    let phone = presets::phone();
    assert_eq!(phone.format("1133334444").text, "(11) 3333-4444");
    assert_eq!(phone.format("11999998888").text, "(11) 99999-8888");
    assert_eq!(phone.format("(11) 9999-98888").text, "(11) 99999-8888");
    assert_eq!(phone.format("119999988887777").text, "(11) 99999-8888");
}

#[test]
fn currency_reads_decimal_amounts_and_reports_their_value() {
    let field = MaskedField::new("valor", presets::currency()).with_value("1234.5");
    assert_eq!(field.text(), "R$ 1.234,50");
    assert_eq!(field.currency_value(), 1234.5);

    let brl = presets::currency();
    assert_eq!(brl.format("123450").text, "R$ 1.234,50");
    assert_eq!(brl.format("5").text, "R$ 0,05");
}

#[test]
fn plates_pick_the_layout_that_fits() {
    let plate = presets::plate();
    assert_eq!(plate.format("abc1234").text, "ABC-1234");
    assert_eq!(plate.format("ABC1D23").text, "ABC1D23");
    assert_eq!(plate.format("abc-1d23").text, "ABC1D23");
    assert_eq!(plate.unmask("ABC-1234"), "ABC1234");
}

#[test]
fn caret_lands_after_the_inserted_separator() {
    let mut field = MaskedField::new("id_cnpj", presets::cnpj());
    type_text(&mut field, "123");
    assert_eq!(field.text(), "12.3");
    assert_eq!(field.cursor(), 4);

    let mut field = MaskedField::new("id_cnpj", presets::cnpj()).with_value("12");
    let update = field.on_input("123", 3);
    assert_eq!(update.text, "12.3");
    assert_eq!(update.cursor, 4);
}

#[test]
fn full_field_ignores_further_typing() {
    let mut field = MaskedField::new("id_cpf", presets::cpf()).with_value("12345678901");
    assert!(field.is_complete());

    let before = field.text().to_string();
    let edited = format!("{before}9");
    let update = field.on_input(edited.as_str(), edited.chars().count());
    assert_eq!(update.text, before);
    assert_eq!(update.cursor, before.chars().count());

    assert!(!field.insert_char('9'));
    assert_eq!(field.unmasked_value(), "12345678901");
}

#[test]
fn generic_unmask_strips_any_decoration() {
    assert_eq!(unmask("12.345.678/0001-95"), "12345678000195");
    assert_eq!(unmask("(11) 99999-8888"), "11999998888");
    assert_eq!(unmask(""), "");
}

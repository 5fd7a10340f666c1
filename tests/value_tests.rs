// Value integration tests
//
// Constructors, printing and release over the public value surface.

use aura::value::{self, Tensor, Value, TENSOR_HEADER_SIZE};
use aura::ValueError;
use pretty_assertions::assert_eq;

fn printed(value: &Value) -> String {
    let mut out = Vec::new();
    value.print(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn primitives_print() {
    assert_eq!(printed(&value::make_undefined()), "undefined\n");
    assert_eq!(printed(&value::make_null()), "null\n");
    assert_eq!(printed(&value::make_boolean(true)), "true\n");
    assert_eq!(printed(&value::make_boolean(false)), "false\n");
    assert_eq!(printed(&value::make_bigint(-42)), "-42n\n");
    assert_eq!(printed(&value::make_vec3(1.0, 0.5, -2.0)), "Vec3(1, 0.5, -2)\n");
}

#[test]
fn numbers_use_shortest_form() {
    assert_eq!(value::make_number(1.0).to_string(), "1");
    assert_eq!(value::make_number(0.1).to_string(), "0.1");
    assert_eq!(value::make_number(-2.5).to_string(), "-2.5");
    assert_eq!(value::make_number(f64::NAN).to_string(), "NaN");
    assert_eq!(value::make_number(f64::INFINITY).to_string(), "Infinity");
    assert_eq!(value::make_number(f64::NEG_INFINITY).to_string(), "-Infinity");
}

#[test]
fn numbers_switch_to_exponent_outside_decimal_window() {
    assert_eq!(value::make_number(1e300).to_string(), "1e+300");
    assert_eq!(value::make_number(1e21).to_string(), "1e+21");
    assert_eq!(value::make_number(-2.5e22).to_string(), "-2.5e+22");
    assert_eq!(value::make_number(1e-7).to_string(), "1e-7");
    assert_eq!(value::make_number(1.5e-10).to_string(), "1.5e-10");
    assert_eq!(value::make_number(f64::MIN_POSITIVE).to_string(), "2.2250738585072014e-308");

    // Inside the window the plain decimal form stays.
    assert_eq!(value::make_number(1e20).to_string(), "100000000000000000000");
    assert_eq!(value::make_number(0.000001).to_string(), "0.000001");
    assert_eq!(value::make_number(123456789.0).to_string(), "123456789");
    assert_eq!(value::make_number(0.0).to_string(), "0");
}

#[test]
fn string_is_owned_copy() {
    let text = String::from("merhaba");
    let value = value::make_string(Some(&text));
    drop(text);
    assert_eq!(value, Value::String("merhaba".to_string()));
    assert_eq!(value.to_string(), "'merhaba'");
}

#[test]
fn absent_string_is_null() {
    assert_eq!(value::make_string(None), Value::Null);
    assert_eq!(value::make_symbol(None), Value::Null);
}

#[test]
fn symbol_prints_description() {
    assert_eq!(value::make_symbol(Some("iterator")).to_string(), "Symbol(iterator)");
}

#[test]
fn tensor_is_zeroed() {
    let value = value::make_tensor(2, 3);
    assert_eq!(value.to_string(), "Tensor[2x3]");
    match &value {
        Value::Tensor(tensor) => {
            assert_eq!(tensor.rows(), 2);
            assert_eq!(tensor.cols(), 3);
            assert_eq!(tensor.as_slice(), &[0.0f32; 6][..]);
            assert_eq!(tensor.allocation_size(), TENSOR_HEADER_SIZE + 6 * 4);
        }
        other => panic!("expected tensor, got {:?}", other),
    }
}

#[test]
fn tensor_rejects_non_positive_dimensions() {
    assert_eq!(value::make_tensor(0, 5), Value::Null);
    assert_eq!(value::make_tensor(-1, 5), Value::Null);
    assert_eq!(value::make_tensor(5, 0), Value::Null);
    assert_eq!(value::make_tensor(3, -7), Value::Null);
    assert_eq!(Tensor::new(0, 5), Err(ValueError::InvalidDimensions { rows: 0, cols: 5 }));
}

#[test]
fn tensor_rejects_overflowing_dimensions() {
    assert_eq!(value::make_tensor(i64::MAX, i64::MAX), Value::Null);
    assert_eq!(value::make_tensor(i64::MAX, 2), Value::Null);
    assert!(matches!(
        Tensor::new(usize::MAX, 2),
        Err(ValueError::ElementCountOverflow { .. })
    ));
    assert!(matches!(
        Tensor::new(usize::MAX / 4, 1),
        Err(ValueError::AllocationSizeOverflow { .. })
    ));
}

#[test]
fn tensor_element_access() {
    let mut tensor = Tensor::new(2, 2).unwrap();
    assert!(tensor.set(1, 0, 4.5));
    assert!(!tensor.set(2, 0, 1.0));
    assert_eq!(tensor.get(1, 0), Some(4.5));
    assert_eq!(tensor.get(0, 2), None);
    assert_eq!(tensor.as_slice(), &[0.0, 0.0, 4.5, 0.0]);
}

#[test]
fn release_is_repeatable_on_non_owning_variants() {
    let mut number = value::make_number(7.0);
    number.release();
    number.release();
    assert_eq!(number, Value::Number(7.0));

    let mut flag = value::make_boolean(true);
    for _ in 0..3 {
        flag.release();
    }
    assert_eq!(flag, Value::Boolean(true));
}

#[test]
fn release_frees_owned_payloads_once() {
    let mut string = value::make_string(Some("owned"));
    string.release();
    assert_eq!(string, Value::Undefined);
    string.release();
    assert_eq!(string, Value::Undefined);
}

#[test]
fn moving_a_value_keeps_its_payload() {
    let original = value::make_tensor(1, 4);
    let holder = vec![original];
    assert_eq!(holder[0].type_name(), "tensor");
}

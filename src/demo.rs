use crate::value::{self, Opaque, Value};
use std::io::{self, Write};

/// One value of every printable variant, in declaration order.
pub fn sample_values() -> Vec<Value> {
    vec![
        value::make_undefined(),
        value::make_null(),
        value::make_boolean(true),
        value::make_number(42.75),
        value::make_string(Some("Aura")),
        value::make_symbol(Some("id")),
        value::make_bigint(1_234_567_890_123_456_789),
        value::make_vec3(1.0, 2.5, -3.0),
        value::make_tensor(2, 3),
        Value::Object(Opaque::new()),
        Value::Array(Opaque::new()),
        Value::Function(Opaque::new()),
    ]
}

/// Prints each sample as `type: value`, then releases it.
pub fn print_values<W: Write>(out: &mut W) -> io::Result<()> {
    for mut value in sample_values() {
        write!(out, "{:<10} ", format!("{}:", value.type_name()))?;
        value.print(out)?;
        value.release();
    }
    Ok(())
}

//! Line protocol encoding for write bodies.
//!
//! One point becomes one line:
//! `measurement,tag=value field=1i,text="x" 1439587925`

use std::collections::BTreeMap;

use crate::model::{FieldValue, Point, Precision};

fn is_special_for_measurement(c: char) -> bool {
    c == ',' || c == ' ' || c == '\n'
}

fn is_special_for_keys_and_tag_values(c: char) -> bool {
    c == ',' || c == '=' || c == ' ' || c == '\n'
}

fn append_escaped(dst: &mut String, s: &str, is_special: fn(char) -> bool) {
    for c in s.chars() {
        if is_special(c) {
            dst.push('\\');
        }
        dst.push(c);
    }
}

fn append_field_value(dst: &mut String, value: &FieldValue) {
    match value {
        FieldValue::Float(v) => dst.push_str(&v.to_string()),
        FieldValue::Integer(v) => {
            dst.push_str(&v.to_string());
            dst.push('i');
        }
        FieldValue::Boolean(v) => dst.push_str(if *v { "true" } else { "false" }),
        FieldValue::String(v) => {
            dst.push('"');
            for c in v.chars() {
                if c == '"' || c == '\\' {
                    dst.push('\\');
                }
                dst.push(c);
            }
            dst.push('"');
        }
    }
}

/// Encode points as line protocol text, one line per point, trailing newline
/// included.
///
/// `global_tags` apply to every point; a point's own tag with the same key
/// wins. Point timestamps are unix nanoseconds and get scaled down to
/// `precision` units (nanoseconds when unset).
pub fn encode(points: &[Point], precision: Option<Precision>, global_tags: &BTreeMap<String, String>) -> String {
    let nanos_per_unit = precision.unwrap_or_default().nanos_per_unit();
    let mut out = String::new();

    for point in points {
        append_escaped(&mut out, &point.measurement, is_special_for_measurement);

        let mut tags = global_tags.clone();
        for (key, value) in &point.tags {
            tags.insert(key.clone(), value.clone());
        }
        for (key, value) in &tags {
            out.push(',');
            append_escaped(&mut out, key, is_special_for_keys_and_tag_values);
            out.push('=');
            append_escaped(&mut out, value, is_special_for_keys_and_tag_values);
        }

        out.push(' ');
        let mut first = true;
        for (key, value) in &point.fields {
            if !first {
                out.push(',');
            }
            first = false;
            append_escaped(&mut out, key, is_special_for_keys_and_tag_values);
            out.push('=');
            append_field_value(&mut out, value);
        }

        if let Some(timestamp) = point.timestamp {
            out.push(' ');
            // floor division so pre-epoch timestamps scale down, not toward zero
            out.push_str(&timestamp.div_euclid(nanos_per_unit).to_string());
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod test_line_protocol {
    use std::collections::BTreeMap;

    use crate::model::{Point, Precision};

    use super::encode;

    fn no_tags() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    #[test]
    fn test_basic_line() {
        let point = Point::new("cpu")
            .tag("host", "server01")
            .field_float("value", 0.64)
            .timestamp_ns(1_439_587_925_000_000_000);

        assert_eq!(
            "cpu,host=server01 value=0.64 1439587925000000000\n",
            encode(&[point], None, &no_tags())
        );
    }

    #[test]
    fn test_field_value_rendering() {
        let point = Point::new("m")
            .field_integer("count", 42)
            .field_bool("ok", true)
            .field_string("text", "say \"hi\"");

        // fields come out in sorted key order
        assert_eq!(
            "m count=42i,ok=true,text=\"say \\\"hi\\\"\"\n",
            encode(&[point], None, &no_tags())
        );
    }

    #[test]
    fn test_escaping() {
        let point = Point::new("my measurement, really")
            .tag("tag key", "a=b,c")
            .field_float("field key", 1.0);

        assert_eq!(
            "my\\ measurement\\,\\ really,tag\\ key=a\\=b\\,c field\\ key=1\n",
            encode(&[point], None, &no_tags())
        );
    }

    #[test]
    fn test_timestamp_scaled_to_precision() {
        let point = Point::new("cpu").field_float("value", 1.0).timestamp_ns(1_439_587_925_123_456_789);

        let encoded = encode(&[point.clone()], Some(Precision::Second), &no_tags());
        assert_eq!("cpu value=1 1439587925\n", encoded);

        let encoded = encode(&[point], Some(Precision::Millisecond), &no_tags());
        assert_eq!("cpu value=1 1439587925123\n", encoded);
    }

    #[test]
    fn test_negative_timestamp_floors() {
        // -1.5s before the epoch is second -2, not second -1
        let point = Point::new("cpu").field_float("value", 1.0).timestamp_ns(-1_500_000_000);

        let encoded = encode(&[point.clone()], Some(Precision::Second), &no_tags());
        assert_eq!("cpu value=1 -2\n", encoded);

        let encoded = encode(&[point], None, &no_tags());
        assert_eq!("cpu value=1 -1500000000\n", encoded);
    }

    #[test]
    fn test_global_tags_merged_point_wins() {
        let mut global_tags = BTreeMap::new();
        global_tags.insert("region".to_string(), "us-east".to_string());
        global_tags.insert("env".to_string(), "prod".to_string());

        let point = Point::new("cpu").tag("region", "us-west").field_float("value", 1.0);

        assert_eq!(
            "cpu,env=prod,region=us-west value=1\n",
            encode(&[point], None, &global_tags)
        );
    }

    #[test]
    fn test_multiple_points_keep_order() {
        let points = vec![
            Point::new("a").field_integer("v", 1),
            Point::new("b").field_integer("v", 2),
        ];

        assert_eq!("a v=1i\nb v=2i\n", encode(&points, None, &no_tags()));
    }
}

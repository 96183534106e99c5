use anyhow::Result;

const UNITS: [&str; 8] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];

/// Human readable byte count using binary prefixes, e.g. `1.5KiB`.
pub fn format_size(num: f64, suffix: &str) -> String {
    let mut num = num;
    for unit in UNITS {
        if num.abs() < 1024.0 {
            return format!("{num:3.1}{unit}{suffix}");
        }
        num /= 1024.0;
    }
    format!("{num:.1}Yi{suffix}")
}

pub fn format_bytes(num: u64) -> String {
    format_size(num as f64, "B")
}

pub fn print_json_value(v: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

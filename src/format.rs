pub fn format_time(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

pub fn format_duration(total_minutes: Option<i64>) -> Option<String> {
    let total_minutes = total_minutes.filter(|m| *m >= 0)?;
    if total_minutes < 60 {
        return Some(format!("{}min", total_minutes));
    }
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if minutes > 0 {
        Some(format!("{}h {}min", hours, minutes))
    } else {
        Some(format!("{}h", hours))
    }
}

pub fn format_distance_km(distance_km: f64) -> String {
    format!("{:.2} km", distance_km)
}

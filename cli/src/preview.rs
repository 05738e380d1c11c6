use leavedesk_core::{format_display_date, LeaveApplication};

/// Plain text rendering of an application, as the student sees it before sending.
pub fn render(application: &LeaveApplication) -> String {
    let summary = application.summary();
    let days = if summary.is_empty() {
        "-".to_string()
    } else {
        summary.describe()
    };
    let or_dash = |s: &str| {
        if s.trim().is_empty() {
            "-".to_string()
        } else {
            s.trim().to_string()
        }
    };

    let lines = [
        ("Academic Year", or_dash(&application.academic_year)),
        ("Semester", or_dash(&application.semester)),
        ("PRN", or_dash(&application.prn)),
        ("Full Name", or_dash(&application.full_name)),
        ("Division", or_dash(&application.division)),
        ("Branch", or_dash(&application.branch)),
        ("Email", or_dash(&application.email)),
        ("Contact", or_dash(&application.contact)),
        ("Class Teacher", or_dash(&application.class_teacher)),
        (
            "Associate Teacher",
            or_dash(application.associate_teacher.as_deref().unwrap_or_default()),
        ),
        ("Type of Leave", application.leave_type.to_string()),
        ("From Date", format_display_date(application.from_date)),
        ("To Date", format_display_date(application.to_date)),
        ("Total Days", days),
        ("Reason", or_dash(&application.reason)),
    ];

    let mut out = String::from("Leave Application Preview\n");
    for (label, value) in lines {
        out.push_str(&format!("{:<18} {}\n", format!("{}:", label), value));
    }
    out
}

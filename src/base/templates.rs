//! Message templates for the offboarding email and the confirmation post.

use super::types::MailFormat;

/// Intro paragraph of the offboarding email.
pub const OFFBOARDING_INTRO: &str = "We certainly appreciate your time working with us. There are just a few steps you'll need to complete first, which you'll find listed below. Please ignore any steps that you may have already completed. If you have any questions, don't hesitate to reach out. Thank you again, and feel free to return in the future!";

/// Experience letter paragraph.
pub const EXPERIENCE_LETTER_INTRO: &str = "Additionally, if you require an experience letter, kindly have your team lead reach out directly via Slack with the following:";

/// Experience letter caveat, rendered highlighted.
pub const EXPERIENCE_LETTER_NOTE: &str = "NOTE: Experience letters will only be provided for those who worked/contributed to the organization.";

/// What the team lead should include when requesting an experience letter.
pub const EXPERIENCE_LETTER_ITEMS: &[&str] = &[
    "Start Date to End Date",
    "Mention primary domain or department, e.g., project management, software development, data engineering, etc.",
    "Role.",
    "Key contributions and achievements. 1-4 points",
];

/// Optional links rendered into the step list.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffboardingLinks<'a> {
    pub hr_contact_email: Option<&'a str>,
    pub exit_survey_url: Option<&'a str>,
}

/// One step of the checklist. `link` is rendered as an anchor in HTML and appended in plain text.
struct Step {
    text: &'static str,
    link: Option<(String, String)>,
}

fn offboarding_steps(links: OffboardingLinks<'_>) -> Vec<Step> {
    vec![
        Step {
            text: "Inform your team leader of your decision to offboard",
            link: None,
        },
        Step {
            text: "Send a resignation letter to HR",
            link: links.hr_contact_email.map(|email| (format!("mailto:{email}"), email.to_string())),
        },
        Step {
            text: "Return company property and access, including e-data (if applicable)",
            link: None,
        },
        Step {
            text: "Conclude outstanding projects and tasks",
            link: None,
        },
        Step {
            text: "Offboard yourself from systems and tools (log out of all company platforms on an agreed-upon date)",
            link: None,
        },
        Step {
            text: "Provide your end date (final working day)",
            link: None,
        },
        Step {
            text: "Complete the exit survey",
            link: links.exit_survey_url.map(|url| (url.to_string(), "Exit Survey".to_string())),
        },
    ]
}

/// Renders the offboarding email body for `name` in the requested format.
pub fn render_offboarding_body(name: &str, links: OffboardingLinks<'_>, format: MailFormat) -> String {
    match format {
        MailFormat::Html => render_html(name, links),
        MailFormat::Plain => render_plain(name, links),
    }
}

fn render_html(name: &str, links: OffboardingLinks<'_>) -> String {
    let steps = offboarding_steps(links)
        .into_iter()
        .map(|step| match step.link {
            Some((href, label)) => format!(
                "      <li>{}: <a href=\"{}\" target=\"_blank\">{}</a></li>\n",
                step.text,
                escape_html(&href),
                escape_html(&label)
            ),
            None => format!("      <li>{}</li>\n", step.text),
        })
        .collect::<String>();

    let letter_items = EXPERIENCE_LETTER_ITEMS
        .iter()
        .map(|item| format!("      <li><b>{item}</b></li>\n"))
        .collect::<String>();

    format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif; font-size: 14px; color: #000000;">
    <p>Hello {name},</p>

    <p>{OFFBOARDING_INTRO}</p>

    <ul>
{steps}    </ul>

    <p>{EXPERIENCE_LETTER_INTRO}</p>

    <p style="background-color: yellow; font-weight: bold;">{EXPERIENCE_LETTER_NOTE}</p>

    <ul>
{letter_items}    </ul>

    <p>Thank you!</p>
  </body>
</html>
"#,
        name = escape_html(name),
    )
}

fn render_plain(name: &str, links: OffboardingLinks<'_>) -> String {
    let steps = offboarding_steps(links)
        .into_iter()
        .map(|step| match step.link {
            Some((href, _)) => format!("  - {}: {}\n", step.text, href.trim_start_matches("mailto:")),
            None => format!("  - {}\n", step.text),
        })
        .collect::<String>();

    let letter_items = EXPERIENCE_LETTER_ITEMS.iter().map(|item| format!("  - {item}\n")).collect::<String>();

    format!("Hello {name},\n\n{OFFBOARDING_INTRO}\n\n{steps}\n{EXPERIENCE_LETTER_INTRO}\n\n{EXPERIENCE_LETTER_NOTE}\n\n{letter_items}\nThank you!\n")
}

/// Text of the confirmation posted once the email is on its way.
pub fn render_initiated_message(name: &str) -> String {
    format!("Hello {name} Your offboarding process has been initiated ✅. Please check your email for further instructions.")
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

use funnel_core::{FunnelViewModel, Step, TargetGender};

const BAR_WIDTH: usize = 30;

/// Remembers what was already printed so each repaint only appends.
#[derive(Debug, Default)]
pub struct Renderer {
    step: Option<Step>,
    lines_shown: usize,
    progress_bucket: Option<u32>,
    rejections_shown: u32,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, view: &FunnelViewModel) -> Vec<String> {
        let mut out = Vec::new();
        if self.step != Some(view.step) {
            self.step = Some(view.step);
            self.lines_shown = 0;
            self.progress_bucket = None;
            self.rejections_shown = view.rejections;
            out.extend(step_header(view));
        }

        match view.step {
            Step::Input => {
                // Every failed submit is announced, even with identical text.
                if view.rejections != self.rejections_shown {
                    self.rejections_shown = view.rejections;
                    if let Some(message) = &view.validation_message {
                        out.push(format!("! {message}"));
                    }
                }
            }
            Step::Processing => {
                for line in view.revealed_lines.iter().skip(self.lines_shown) {
                    out.push(format!("> {line}"));
                }
                self.lines_shown = view.revealed_lines.len();

                // Repaint the bar every 10%.
                let bucket = (view.progress_percent / 10.0).floor() as u32;
                if self.progress_bucket != Some(bucket) {
                    self.progress_bucket = Some(bucket);
                    out.push(progress_bar(view.progress_percent));
                }
            }
            Step::Initial | Step::Result | Step::LockedReport => {}
        }
        out
    }
}

fn step_header(view: &FunnelViewModel) -> Vec<String> {
    match view.step {
        Step::Initial => vec![
            "== Start ==".to_string(),
            "Choose a target: [1] male  [2] female  (q to quit)".to_string(),
        ],
        Step::Input => vec![
            format!(
                "== Target: {} ==",
                view.target_gender.map_or("unknown", TargetGender::as_str)
            ),
            "Enter the phone number:".to_string(),
        ],
        Step::Processing => vec![format!(
            "== Processing {} ==",
            view.target_phone.as_deref().unwrap_or("")
        )],
        Step::Result => vec![
            "== Result ==".to_string(),
            format!(
                "Analysis of {} finished. Press Enter to view the report.",
                view.target_phone.as_deref().unwrap_or("")
            ),
        ],
        Step::LockedReport => {
            let mut lines = vec![
                "== Report ==".to_string(),
                "The full report is locked.".to_string(),
            ];
            if view.offer_available {
                lines.push("Type 'open' to continue, or q to quit.".to_string());
            } else {
                lines.push("Press q to quit.".to_string());
            }
            lines
        }
    }
}

pub fn progress_bar(percent: f64) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_core::{update, FunnelState, Msg};
    use pretty_assertions::assert_eq;

    fn processing_view(percent: f64, lines: &[&str]) -> FunnelViewModel {
        FunnelViewModel {
            step: Step::Processing,
            target_phone: Some("923123456".to_string()),
            progress_percent: percent,
            revealed_lines: lines.iter().map(|line| line.to_string()).collect(),
            ..FunnelViewModel::default()
        }
    }

    #[test]
    fn progress_bar_scales_to_width() {
        assert_eq!(progress_bar(0.0), format!("[{}]   0%", ".".repeat(30)));
        assert_eq!(progress_bar(100.0), format!("[{}] 100%", "#".repeat(30)));
        assert!(progress_bar(50.0).starts_with(&format!("[{}.", "#".repeat(15))));
    }

    #[test]
    fn processing_only_appends_new_lines() {
        let mut renderer = Renderer::new();
        let first = renderer.render(&processing_view(12.0, &["a"]));
        assert_eq!(first[0], "== Processing 923123456 ==");
        assert_eq!(first[1], "> a");
        assert!(first[2].ends_with(" 12%"));

        let second = renderer.render(&processing_view(15.0, &["a"]));
        assert!(second.is_empty());

        let third = renderer.render(&processing_view(21.0, &["a", "b"]));
        assert_eq!(third[0], "> b");
        assert_eq!(third.len(), 2);
    }

    #[test]
    fn validation_message_is_printed_once_per_failure() {
        let mut renderer = Renderer::new();
        let input = FunnelViewModel {
            step: Step::Input,
            target_gender: Some(TargetGender::Male),
            ..FunnelViewModel::default()
        };
        assert_eq!(renderer.render(&input).len(), 2);

        let failed = FunnelViewModel {
            validation_message: Some("Please enter a valid phone number.".to_string()),
            rejections: 1,
            ..input.clone()
        };
        let out = renderer.render(&failed);
        assert_eq!(out, vec!["! Please enter a valid phone number.".to_string()]);
        assert!(renderer.render(&failed).is_empty());
    }

    #[test]
    fn repeated_failed_submits_are_each_announced() {
        let mut state = FunnelState::new();
        let mut renderer = Renderer::new();
        let mut send = |state: FunnelState, msgs: Vec<Msg>| {
            let (state, _) = msgs
                .into_iter()
                .fold((state, Vec::new()), |(state, _), msg| update(state, msg));
            let out = renderer.render(&state.view());
            (state, out)
        };

        let (next, _) = send(state, vec![Msg::TargetSelected(TargetGender::Male)]);
        state = next;
        let (next, first) = send(
            state,
            vec![Msg::PhoneInputChanged("123".to_string()), Msg::SubmitClicked],
        );
        state = next;
        assert_eq!(first, vec!["! Please enter a valid phone number.".to_string()]);

        let (_, second) = send(
            state,
            vec![Msg::PhoneInputChanged("4567".to_string()), Msg::SubmitClicked],
        );
        assert_eq!(second, vec!["! Please enter a valid phone number.".to_string()]);
    }
}

//! Page sequence assembly

use crate::activity::{CoverPage, GeneratedActivity, PrintablePage, UserInputs};

/// Cover first, then the generated activities untouched and in order.
///
/// No structural checks happen here; malformed geometry is left for the
/// renderer to degrade.
pub fn assemble_pages(inputs: &UserInputs, activities: Vec<GeneratedActivity>) -> Vec<PrintablePage> {
    let cover = PrintablePage::Cover(CoverPage {
        recipient_name: inputs.recipient_name.clone(),
        theme: inputs.theme.clone(),
    });
    std::iter::once(cover)
        .chain(activities.into_iter().map(PrintablePage::Activity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityType, QuizData};

    fn quiz(title: &str) -> GeneratedActivity {
        GeneratedActivity::Quiz(QuizData { title: title.into(), questions: vec![] })
    }

    #[test]
    fn cover_then_three_activities() {
        let inputs = UserInputs {
            theme: "Dinosaurs".into(),
            recipient_name: "Turma A".into(),
            activity_type: ActivityType::Quiz,
            ..Default::default()
        };
        let pages = assemble_pages(&inputs, vec![quiz("1"), quiz("2"), quiz("3")]);
        assert_eq!(pages.len(), 4);
        assert_eq!(
            pages[0],
            PrintablePage::Cover(CoverPage {
                recipient_name: "Turma A".into(),
                theme: "Dinosaurs".into()
            })
        );
        assert_eq!(pages[3], PrintablePage::Activity(quiz("3")));
        assert!(pages[1..].iter().all(|p| matches!(p, PrintablePage::Activity(_))));
    }
}

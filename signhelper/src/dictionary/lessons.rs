//! Lesson browser over dictionary categories.

use serde::Serialize;

use super::data::{SignCategory, SignDictionary, SignItem};

/// Lookup failures for lessons.
#[derive(Debug, thiserror::Error)]
pub enum LessonError {
    #[error("no lesson with id '{0}'")]
    UnknownCategory(String),

    #[error("dictionary has no lessons")]
    Empty,
}

/// One row of the course list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub difficulty: String,
    pub sign_count: usize,
}

/// The highlighted lesson of the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyChallenge {
    pub category_id: String,
    pub sign_title: String,
    pub prompt: String,
}

/// A numbered step inside a lesson.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonStep {
    pub number: usize,
    pub heading: String,
    pub description: String,
}

/// Full lesson page for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonDetail {
    pub title: String,
    pub icon: String,
    pub difficulty: String,
    pub introduction: String,
    pub steps: Vec<LessonStep>,
}

/// Every category as a course row.
pub fn course_list(dictionary: &SignDictionary) -> Vec<CourseSummary> {
    dictionary
        .categories()
        .iter()
        .map(|c| CourseSummary {
            id: c.id.clone(),
            title: c.title.clone(),
            icon: c.icon.clone(),
            difficulty: c.difficulty.clone(),
            sign_count: c.signs.len(),
        })
        .collect()
}

/// First sign of the first category.
pub fn daily_challenge(dictionary: &SignDictionary) -> Result<DailyChallenge, LessonError> {
    let category = dictionary.categories().first().ok_or(LessonError::Empty)?;
    let sign = category.signs.first().ok_or(LessonError::Empty)?;
    Ok(DailyChallenge {
        category_id: category.id.clone(),
        sign_title: sign.title.clone(),
        prompt: format!("Learn how to sign '{}'", sign.title),
    })
}

/// Lesson page for `category_id`.
pub fn lesson_detail(
    dictionary: &SignDictionary,
    category_id: &str,
) -> Result<LessonDetail, LessonError> {
    let category = dictionary
        .category(category_id)
        .ok_or_else(|| LessonError::UnknownCategory(category_id.to_string()))?;
    Ok(build_detail(category))
}

fn build_detail(category: &SignCategory) -> LessonDetail {
    LessonDetail {
        title: category.title.clone(),
        icon: category.icon.clone(),
        difficulty: category.difficulty.clone(),
        introduction: format!(
            "In this lesson, you will learn the basic signs for {}. \
             Follow the video tutorials below and practice with your camera.",
            category.title.to_lowercase()
        ),
        steps: category
            .signs
            .iter()
            .enumerate()
            .map(|(i, sign)| step(i + 1, sign))
            .collect(),
    }
}

fn step(number: usize, sign: &SignItem) -> LessonStep {
    LessonStep {
        number,
        heading: format!("Step {}: {}", number, sign.title),
        description: sign.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_list() {
        let dict = SignDictionary::bundled().unwrap();
        let courses = course_list(&dict);
        assert_eq!(courses.len(), dict.categories().len());
        assert_eq!(courses[0].id, "greetings");
        assert_eq!(courses[0].sign_count, 3);
    }

    #[test]
    fn test_daily_challenge() {
        let dict = SignDictionary::bundled().unwrap();
        let challenge = daily_challenge(&dict).unwrap();
        assert_eq!(challenge.prompt, "Learn how to sign 'Hello'");
        assert_eq!(challenge.category_id, "greetings");
    }

    #[test]
    fn test_daily_challenge_empty() {
        let dict = SignDictionary::new(Vec::new());
        assert!(matches!(daily_challenge(&dict), Err(LessonError::Empty)));
    }

    #[test]
    fn test_lesson_detail_steps() {
        let dict = SignDictionary::bundled().unwrap();
        let detail = lesson_detail(&dict, "greetings").unwrap();
        let headings: Vec<_> = detail.steps.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec!["Step 1: Hello", "Step 2: Thank You", "Step 3: Help"]
        );
        assert!(detail.introduction.contains("greetings & routines"));
        assert!(detail
            .introduction
            .ends_with("Follow the video tutorials below and practice with your camera."));
    }

    #[test]
    fn test_unknown_lesson() {
        let dict = SignDictionary::fallback();
        let err = lesson_detail(&dict, "animals").unwrap_err();
        assert_eq!(err.to_string(), "no lesson with id 'animals'");
    }
}

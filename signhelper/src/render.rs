//! Rendering of results for the terminal.
//!
//! Text output is meant for people; JSON output is one object per line
//! (or one document for lists) for scripts.

use std::io::{self, Write};

use serde::Serialize;

use crate::dictionary::lessons::{CourseSummary, DailyChallenge, LessonDetail};
use crate::dictionary::SignItem;
use crate::recognition::{Classification, GestureLabel, TranslatorEvent};
use crate::session::SessionReport;

/// Output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Writes results in the chosen format.
pub struct Renderer<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    fn json_line<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)
    }

    /// One translator event.
    pub fn event(&mut self, event: &TranslatorEvent) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json_line(event);
        }
        match event {
            TranslatorEvent::GestureChanged { label, confidence } => match label {
                Some(l) => writeln!(self.out, "Detecting: {} ({:.2})", l.as_str(), confidence),
                None => writeln!(self.out, "Detecting: -"),
            },
            TranslatorEvent::WordAccepted { sentence, .. } => {
                writeln!(self.out, "Translation: {}", sentence)
            }
            TranslatorEvent::SentenceCleared => writeln!(self.out, "Translation cleared"),
        }
    }

    /// End-of-session summary.
    pub fn report(&mut self, report: &SessionReport) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json_line(report);
        }
        writeln!(self.out)?;
        if report.sentence.is_empty() {
            writeln!(self.out, "No words recognized.")?;
        } else {
            writeln!(self.out, "Final translation: {}", report.sentence)?;
        }
        writeln!(
            self.out,
            "Supported: {}",
            GestureLabel::supported_hint()
        )?;
        writeln!(
            self.out,
            "Frames: {} read, {} classified, {} dropped, {} invalid",
            report.frames_read, report.frames_sampled, report.frames_dropped, report.frames_invalid
        )
    }

    /// Per-frame classification (no debounce).
    pub fn classification(&mut self, index: u64, c: &Classification) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            #[derive(Serialize)]
            struct Line<'a> {
                frame: u64,
                #[serde(flatten)]
                classification: &'a Classification,
            }
            return self.json_line(&Line {
                frame: index,
                classification: c,
            });
        }
        match c.label {
            Some(l) => writeln!(self.out, "{:>6}  {:<10} {:.2}", index, l.as_str(), c.confidence),
            None => writeln!(self.out, "{:>6}  -", index),
        }
    }

    /// Text-to-sign results.
    pub fn signs(&mut self, input: &str, signs: &[&SignItem]) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json_line(&signs);
        }
        if signs.is_empty() {
            return writeln!(self.out, "No matching signs found for \"{}\"", input.trim());
        }
        for sign in signs {
            writeln!(self.out, "{}", sign.title)?;
            writeln!(self.out, "  {}", sign.description)?;
            let image = sign.demo_image_name.as_deref().unwrap_or(&sign.image_name);
            writeln!(self.out, "  image: {}", image)?;
        }
        Ok(())
    }

    /// Course list with the daily challenge on top.
    pub fn courses(
        &mut self,
        challenge: Option<&DailyChallenge>,
        courses: &[CourseSummary],
    ) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            #[derive(Serialize)]
            struct Listing<'a> {
                daily_challenge: Option<&'a DailyChallenge>,
                courses: &'a [CourseSummary],
            }
            return self.json_line(&Listing {
                daily_challenge: challenge,
                courses,
            });
        }
        if let Some(c) = challenge {
            writeln!(self.out, "Daily Challenge: {} [{}]", c.prompt, c.category_id)?;
            writeln!(self.out)?;
        }
        writeln!(self.out, "Courses")?;
        for course in courses {
            writeln!(
                self.out,
                "  {:<14} {:<24} {:<8} {} sign(s)",
                course.id, course.title, course.difficulty, course.sign_count
            )?;
        }
        Ok(())
    }

    /// One lesson page.
    pub fn lesson(&mut self, lesson: &LessonDetail) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return self.json_line(lesson);
        }
        writeln!(self.out, "{} ({})", lesson.title, lesson.difficulty)?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", lesson.introduction)?;
        writeln!(self.out)?;
        for step in &lesson.steps {
            writeln!(self.out, "{}", step.heading)?;
            writeln!(self.out, "    {}", step.description)?;
        }
        Ok(())
    }

    /// Demo phrases and supported recognition words.
    pub fn demo_phrases(&mut self, phrases: &[&str]) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            let words: Vec<&str> = GestureLabel::ALL.iter().map(|l| l.as_str()).collect();
            return self.json_line(&serde_json::json!({
                "demo_phrases": phrases,
                "supported_words": words,
            }));
        }
        writeln!(self.out, "Try: {}", phrases.join(", "))?;
        writeln!(self.out, "Supported: {}", GestureLabel::supported_hint())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

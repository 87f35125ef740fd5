//! User-facing message texts, one renderer per [`Notice`].

use potret_core::ValidationError;
use potret_engine::Notice;

pub fn render(notice: &Notice) -> String {
    match notice {
        Notice::Welcome => "Welcome! Send me a photo and I will turn it into a \
formal ID picture: formal shirt, white clothing, blue background by default.\n\n\
After the result arrives you have 60 seconds to revise it, e.g. \
\"change background to red\" or \"wear a black shirt\".\n\n\
/help shows the full guide, /cancel discards the current photo."
            .to_string(),
        Notice::Help => "How it works:\n\
1. Send a clear photo of yourself (JPEG, PNG or WebP, up to 10 MB, at least 512px).\n\
2. Wait while I generate the formal version.\n\
3. Within 60 seconds you may send a revision in plain words:\n\
   - \"change background to red\"\n\
   - \"wear a black shirt\"\n\
   - \"white background black shirt\"\n\n\
Commands: /start begins over, /cancel discards the current photo."
            .to_string(),
        Notice::Cancelled => "Cancelled. Send a new photo whenever you are ready.".to_string(),
        Notice::NothingToCancel => "There is nothing to cancel right now.".to_string(),
        Notice::Processing { revision: false } => {
            "Got it! Generating your formal photo, this takes about 30 seconds...".to_string()
        }
        Notice::Processing { revision: true } => {
            "Applying your revision, one moment...".to_string()
        }
        Notice::Result { params, revised, .. } => {
            let header = if *revised {
                "Here is the revised photo."
            } else {
                "Here is your formal photo."
            };
            format!(
                "{header}\n\
Clothing: {} ({})\nBackground: {}\n\n\
You have 60 seconds to request changes, e.g. \"change background to gray\".",
                params.clothing_type, params.clothing_color, params.background_color
            )
        }
        Notice::NotUnderstood => "I did not catch a change in that. Try something like:\n\
- \"change background to red\"\n\
- \"wear a black shirt\"\n\
- \"white background black shirt\""
            .to_string(),
        Notice::Expired => "The revision window has closed. Send a new photo to start over."
            .to_string(),
        Notice::SendPhotoFirst => "Please send a photo first, then I can work on it.".to_string(),
        Notice::Rejected(err) => render_rejection(err),
        Notice::GenerationFailed { timed_out: true } => {
            "Generation took too long and was aborted. Please try again in a moment.".to_string()
        }
        Notice::GenerationFailed { timed_out: false } => {
            "The image service is having trouble right now. Please try again in a moment."
                .to_string()
        }
        Notice::UnknownCommand(name) => {
            format!("Unknown command /{name}. Try /help for the list of commands.")
        }
        Notice::InternalError => {
            "Something went wrong on my side. Please send your photo again.".to_string()
        }
    }
}

fn render_rejection(err: &ValidationError) -> String {
    match err {
        ValidationError::FileTooLarge { size, max } => format!(
            "That file is too large ({:.1} MB). The limit is {} MB.",
            *size as f64 / (1024.0 * 1024.0),
            max / (1024 * 1024)
        ),
        ValidationError::UnsupportedFormat(mime) => format!(
            "I cannot read {mime} files. Please send a JPEG, PNG or WebP photo."
        ),
        ValidationError::ImageTooSmall { width, height, min } => format!(
            "That photo is {width}x{height}, which is too small. Both sides must be at least {min}px."
        ),
        ValidationError::NoFaceDetected => {
            "I could not find a face in that photo. Please send a clear portrait.".to_string()
        }
        ValidationError::MultipleFaces => {
            "I can only work on one person at a time. Please send a photo with a single face."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use potret_core::PromptParams;

    #[test]
    fn result_caption_names_the_current_parameters() {
        let text = render(&Notice::Result {
            photo: "https://cdn.example/out.jpg".into(),
            params: PromptParams {
                clothing_type: "polo shirt".into(),
                clothing_color: "black".into(),
                background_color: "red".into(),
            },
            revised: true,
        });
        assert!(text.contains("polo shirt (black)"));
        assert!(text.contains("Background: red"));
        assert!(text.starts_with("Here is the revised photo."));
    }

    #[test]
    fn rejection_texts_carry_the_limit() {
        let text = render(&Notice::Rejected(ValidationError::FileTooLarge {
            size: 12 * 1024 * 1024,
            max: 10 * 1024 * 1024,
        }));
        assert!(text.contains("10 MB"));
    }

    #[test]
    fn every_notice_renders_nonempty() {
        let notices = [
            Notice::Welcome,
            Notice::Help,
            Notice::Cancelled,
            Notice::NothingToCancel,
            Notice::Processing { revision: false },
            Notice::NotUnderstood,
            Notice::Expired,
            Notice::SendPhotoFirst,
            Notice::GenerationFailed { timed_out: true },
            Notice::UnknownCommand("magic".into()),
            Notice::InternalError,
        ];
        for notice in notices {
            assert!(!render(&notice).is_empty());
        }
    }
}

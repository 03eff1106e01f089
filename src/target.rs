use crate::job::Job;
use crate::media::InputKind;

#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum TargetType {
    VideoSticker,
    StaticSticker,
    Emoji,
}

impl TargetType {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::VideoSticker => "Video Sticker",
            Self::StaticSticker => "Static Sticker",
            Self::Emoji => "Emoji",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct InputSummary {
    pub(crate) total: usize,
    pub(crate) image: usize,
    pub(crate) gif: usize,
    pub(crate) video: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TargetStatus {
    Ok,
    Warning,
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TargetHint {
    pub(crate) status: TargetStatus,
    pub(crate) message: String,
}

pub(crate) fn summarize_jobs(jobs: &[Job]) -> InputSummary {
    let mut summary = InputSummary::default();
    for job in jobs {
        summary.total += 1;
        match job.kind {
            InputKind::Image => summary.image += 1,
            InputKind::Gif => summary.gif += 1,
            InputKind::Video => summary.video += 1,
        }
    }
    summary
}

pub(crate) fn evaluate_target(summary: InputSummary, target: TargetType) -> TargetHint {
    if summary.total == 0 {
        return TargetHint { status: TargetStatus::Blocked, message: "No selection".to_owned() };
    }
    let allowed = allowed_count(summary, target);
    if allowed == 0 {
        return TargetHint { status: TargetStatus::Blocked, message: blocked_message(target).to_owned() };
    }
    if allowed < summary.total {
        return TargetHint { status: TargetStatus::Warning, message: warning_message(target).to_owned() };
    }
    TargetHint { status: TargetStatus::Ok, message: String::new() }
}

pub(crate) fn filter_jobs_for_target(jobs: &[Job], target: TargetType) -> Vec<Job> {
    jobs.iter().filter(|job| is_allowed_kind(job.kind, target)).cloned().collect()
}

fn allowed_count(summary: InputSummary, target: TargetType) -> usize {
    match target {
        TargetType::VideoSticker => summary.video + summary.gif,
        TargetType::StaticSticker | TargetType::Emoji => summary.image,
    }
}

fn is_allowed_kind(kind: InputKind, target: TargetType) -> bool {
    match target {
        TargetType::VideoSticker => matches!(kind, InputKind::Video | InputKind::Gif),
        TargetType::StaticSticker | TargetType::Emoji => kind == InputKind::Image,
    }
}

fn blocked_message(target: TargetType) -> &'static str {
    match target {
        TargetType::VideoSticker => "Must select videos or GIFs for this target",
        TargetType::StaticSticker | TargetType::Emoji => "Must select images for this target",
    }
}

fn warning_message(target: TargetType) -> &'static str {
    match target {
        TargetType::VideoSticker => "Only videos or GIFs will be processed",
        TargetType::StaticSticker | TargetType::Emoji => "Only images will be processed",
    }
}

use crate::catalog::Catalog;
use crate::editor::Editor;
use crate::model::{MAX_APPLICATIONS, University};
use crate::store::Directory;
use crate::viewer::ProfileView;

pub fn display_not_found() {
    println!("User not found.");
    println!("  -> back to dashboard");
}

pub fn display_profile(view: &ProfileView) {
    let user = &view.user;
    println!("Profile of {}", user.name);
    println!();
    match user.gpa {
        Some(gpa) => println!("GPA: {gpa:.2} / 4.5"),
        None => println!("GPA: no information"),
    }
    if user.language_scores.is_empty() {
        println!("Language scores: none");
    } else {
        println!("Language scores:");
        for score in &user.language_scores {
            println!("  - {}: {}", score.kind, score.score);
        }
    }
    println!();
    if view.applications.is_empty() {
        println!("{} has not applied to any university yet.", user.name);
    } else {
        println!("Applied universities ({}):", view.applications.len());
        for (university, rank) in &view.applications {
            display_university(*rank, university);
        }
    }
    if view.can_open_editor() {
        println!();
        println!("  -> edit applications");
    }
}

fn display_university(rank: usize, university: &University) {
    println!(
        "  {}. {} - applicants: {}, seats: {}",
        rank,
        university,
        university.applicant_count,
        university.seats()
    );
    for notice in &university.notices {
        println!("       ! {notice}");
    }
}

pub fn display_editor<D: Directory, C: Catalog>(editor: &Editor<'_, D, C>) {
    println!("Applications of {}", editor.user().name);
    println!();
    if editor.can_edit() {
        println!("Editing is open.");
        println!("  - remaining edits: {}", editor.remaining_edits());
    } else {
        println!("Editing is closed.");
        for blocker in editor.edit_blockers() {
            println!("  - {blocker}");
        }
    }
    println!();
    let candidate = editor.candidate();
    println!(
        "My applications ({}/{}):",
        candidate.len(),
        MAX_APPLICATIONS
    );
    for applied in candidate.entries() {
        match editor.university(&applied.university) {
            Some(university) => display_university(applied.rank, university),
            None => println!("  {}. {}", applied.rank, applied.university),
        }
    }
    println!();
    println!("Available universities:");
    for university in editor.available_universities() {
        match candidate.rank_of(&university.id) {
            Some(rank) => println!("  [{}] {} ({})", university.id, university, rank),
            None => println!("  [{}] {}", university.id, university),
        }
    }
    if !editor.custom_universities().is_empty() {
        println!(
            "({} university(ies) added during this session)",
            editor.custom_universities().len()
        );
    }
    if editor.is_submitting() {
        println!("(submission in progress)");
    } else if editor.has_pending_changes() {
        println!("(unsaved changes)");
    }
    if let Some(notice) = editor.notice() {
        println!();
        println!("{notice}");
    }
}

pub fn display_search_results(query: &str, results: &[University]) {
    if results.is_empty() {
        println!("No university matches \"{query}\".");
        return;
    }
    println!("Universities matching \"{query}\":");
    for (index, university) in results.iter().enumerate() {
        println!(
            "  [{}] {} - seats: {}",
            index + 1,
            university,
            university.seats()
        );
    }
}

use jumper::anim::{Animator, ClipId, ClipLibrary};
use jumper::error::GameError;

// ── Clip libraries ────────────────────────────────────────────────────────────

#[test]
fn clip_library_rejects_empty_clips() {
    let err = ClipLibrary::new(&[(ClipId::Jump, 4), (ClipId::Die, 0)]).unwrap_err();
    assert!(matches!(err, GameError::EmptyClip(ClipId::Die)));
}

#[test]
fn clip_library_reports_frame_counts() {
    let lib = ClipLibrary::new(&[(ClipId::Jump, 4), (ClipId::Landing, 3)]).unwrap();
    assert_eq!(lib.frames(ClipId::Jump), 4);
    assert_eq!(lib.frames(ClipId::Landing), 3);
}

// ── Playback ──────────────────────────────────────────────────────────────────

#[test]
fn clip_advances_frame_by_frame_and_completes() {
    let mut anim = Animator::new(ClipId::Jump);
    assert!(anim.try_start(ClipId::Landing, 3, 0.1));
    assert!(anim.is_playing());
    assert_eq!(anim.shown(), (ClipId::Landing, 0));

    anim.advance(0.05); // timer below the delay: same frame
    assert_eq!(anim.shown(), (ClipId::Landing, 0));

    anim.advance(0.06); // crosses the delay
    assert_eq!(anim.shown(), (ClipId::Landing, 1));

    anim.advance(0.11);
    assert_eq!(anim.shown(), (ClipId::Landing, 2));

    // The last frame is held for one more delay, then the clip completes.
    anim.advance(0.11);
    assert!(!anim.is_playing());
    assert_eq!(anim.last_done(), Some(ClipId::Landing));
}

#[test]
fn shown_frame_persists_through_idle() {
    let mut anim = Animator::new(ClipId::Jump);
    anim.try_start(ClipId::Landing, 2, 0.01);
    anim.advance(0.02);
    anim.advance(0.02);
    assert!(!anim.is_playing());
    // The renderer keeps drawing the final frame.
    assert_eq!(anim.shown(), (ClipId::Landing, 1));
}

// ── Transition rule ───────────────────────────────────────────────────────────

#[test]
fn completed_clip_does_not_immediately_replay() {
    let mut anim = Animator::new(ClipId::Jump);
    anim.try_start(ClipId::Landing, 1, 0.01);
    anim.advance(0.02);
    assert_eq!(anim.last_done(), Some(ClipId::Landing));

    // Same clip again straight away: refused.
    assert!(!anim.try_start(ClipId::Landing, 1, 0.01));
    // A different clip is fine…
    assert!(anim.try_start(ClipId::Jump, 2, 0.01));
    anim.advance(0.02);
    anim.advance(0.02);
    // …after which the landing clip may run again.
    assert!(anim.try_start(ClipId::Landing, 1, 0.01));
}

#[test]
fn no_start_while_a_clip_is_playing() {
    let mut anim = Animator::new(ClipId::Jump);
    anim.try_start(ClipId::Jump, 4, 0.15);
    assert!(!anim.try_start(ClipId::Landing, 3, 0.01));
    assert_eq!(anim.current_clip(), Some(ClipId::Jump));
}

#[test]
fn force_start_interrupts_a_playing_clip() {
    let mut anim = Animator::new(ClipId::Jump);
    anim.try_start(ClipId::Jump, 4, 0.15);
    anim.force_start(ClipId::Die, 6, 0.05);
    assert_eq!(anim.current_clip(), Some(ClipId::Die));
    assert_eq!(anim.shown(), (ClipId::Die, 0));
}

//! Mounting the built-in portfolio and driving it like the demo does.

use std::time::Duration;

use spark_reveal::engine;
use spark_reveal::state::{scroll, timers, viewport};
use spark_reveal::{
    paint_page, DiffRenderer, ManualClock, Page, PageError, PagePreset, SequencePhase,
};

fn setup() -> ManualClock {
    timers::reset_timers();
    viewport::reset_viewport();
    engine::reset_registry();
    scroll::reset_scroll();
    let clock = ManualClock::new();
    timers::use_clock(clock.clone());
    clock
}

fn portfolio() -> Page {
    Page::mount(&PagePreset::portfolio().unwrap(), 80, 24).unwrap()
}

fn phase(page: &Page, id: &str) -> SequencePhase {
    page.section(id).unwrap().reveal().phase()
}

#[test]
fn hero_fills_the_first_screen() {
    let _clock = setup();
    let page = portfolio();

    let home = page.layout().bounds(page.section("home").unwrap().target()).unwrap();
    assert_eq!(home.y, 0);
    assert_eq!(home.height, 24);

    assert!(page.section("home").unwrap().reveal().section_visible());
    for id in ["about", "experience", "projects", "skills", "contact"] {
        assert_eq!(phase(&page, id), SequencePhase::Armed, "{id}");
    }
}

#[test]
fn hero_items_follow_the_stagger() {
    let clock = setup();
    let page = portfolio();
    let home = page.section("home").unwrap().reveal();

    assert!(home.revealed_indices().is_empty());
    page.tick();
    assert_eq!(home.revealed_indices(), vec![0]);

    clock.advance(Duration::from_millis(200));
    page.tick();
    assert_eq!(home.revealed_indices(), vec![0, 1]);

    clock.advance(Duration::from_millis(400));
    page.tick();
    assert_eq!(home.revealed_indices(), vec![0, 1, 2, 3]);
    assert_eq!(home.phase(), SequencePhase::Settled);
}

#[test]
fn jumping_to_a_section_reveals_what_lands_on_screen() {
    let clock = setup();
    let page = portfolio();

    assert!(page.scroll_to_section("experience"));
    let experience = page.section("experience").unwrap().reveal();
    assert!(experience.section_visible());
    assert!(page.section("projects").unwrap().reveal().section_visible());

    // Jumped over without ever being on screen
    assert_eq!(phase(&page, "about"), SequencePhase::Armed);

    page.tick();
    clock.advance(Duration::from_millis(300));
    page.tick();
    assert_eq!(experience.revealed_indices(), vec![0, 1]);

    let frame = paint_page(&page);
    assert_eq!(frame.line(0), "  Experience & Education");
    assert!(frame.line(2).contains("Senior Full Stack Developer"));
    assert!(frame.line(4).starts_with("  ···"));
}

#[test]
fn scrolling_to_the_end_settles_everything_passed() {
    let clock = setup();
    let page = portfolio();

    while page.scroll_by(scroll::WHEEL_SCROLL) {
        page.tick();
        clock.advance(Duration::from_millis(16));
    }
    clock.advance(Duration::from_secs(5));
    page.tick();

    for section in page.sections() {
        assert_eq!(section.reveal().phase(), SequencePhase::Settled, "{}", section.id());
    }
    assert_eq!(page.scroll_offset(), page.layout().max_scroll(24));
}

#[test]
fn frames_change_only_while_revealing() {
    let clock = setup();
    let page = portfolio();
    let mut renderer = DiffRenderer::new(Vec::<u8>::new());

    assert!(renderer.render(&paint_page(&page)).unwrap());
    assert!(!renderer.render(&paint_page(&page)).unwrap());

    clock.advance(Duration::from_millis(200));
    page.tick();
    assert!(renderer.render(&paint_page(&page)).unwrap());

    clock.advance(Duration::from_secs(5));
    page.tick();
    renderer.render(&paint_page(&page)).unwrap();
    assert!(!renderer.render(&paint_page(&page)).unwrap());
}

#[test]
fn unmount_releases_everything() {
    let _clock = setup();
    let page = portfolio();
    let home = page.section("home").unwrap().reveal().clone();

    page.unmount();

    assert!(home.is_detached());
    assert_eq!(engine::get_allocated_count(), 0);
    assert_eq!(viewport::observer_count(), 0);
    assert_eq!(timers::pending_timers(), 0);
}

#[test]
fn remount_starts_fresh() {
    let clock = setup();
    {
        let page = portfolio();
        clock.advance(Duration::from_secs(1));
        page.tick();
        assert_eq!(phase(&page, "home"), SequencePhase::Settled);
    }

    let page = portfolio();
    assert_eq!(phase(&page, "home"), SequencePhase::Revealing);
    assert!(page.section("home").unwrap().reveal().revealed_indices().is_empty());
    assert_eq!(page.scroll_offset(), 0);
}

#[test]
fn pages_mount_independently() {
    let _clock = setup();
    let first = portfolio();
    assert!(matches!(
        Page::mount(&PagePreset::portfolio().unwrap(), 80, 24),
        Err(PageError::AlreadyMounted(_))
    ));

    let mut renamed = PagePreset::portfolio().unwrap();
    renamed.name = "portfolio-2".into();
    let second = Page::mount(&renamed, 80, 24).unwrap();

    assert!(first.scroll_to_section("about"));
    assert_eq!(second.scroll_offset(), 0);

    drop(first);
    assert!(!second.section("about").unwrap().reveal().is_detached());
    assert_eq!(phase(&second, "about"), SequencePhase::Armed);
    assert!(second.scroll_to_section("about"));
    assert!(second.section("about").unwrap().reveal().section_visible());
}

#[test]
fn duplicate_section_ids_are_rejected() {
    let _clock = setup();
    let mut preset = PagePreset::portfolio().unwrap();
    let copy = preset.sections[0].clone();
    preset.sections.push(copy);

    let err = Page::mount(&preset, 80, 24).err().unwrap();
    assert!(matches!(err, PageError::DuplicateSection(ref id) if id == "home"));
    assert_eq!(engine::get_allocated_count(), 0);
}

#[test]
fn presets_load_from_disk() {
    let dir = std::env::temp_dir().join(format!("spark-reveal-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("mini.ron");
    std::fs::write(
        &path,
        r#"PagePreset(name: "mini", sections: [(id: "only", title: "Only", items: ["a"])])"#,
    )
    .unwrap();

    let preset = PagePreset::load(&path).unwrap();
    assert_eq!(preset.sections.len(), 1);
    assert_eq!(preset.gap, 1);

    let missing = PagePreset::load(dir.join("missing.ron")).err().unwrap();
    assert!(matches!(missing, PageError::Io { .. }));

    std::fs::remove_dir_all(&dir).unwrap();
}

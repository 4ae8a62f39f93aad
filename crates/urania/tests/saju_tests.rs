use urania::saju::{
    active_daeun, analyze_compatibility, build_daeun_sequence, convert_saju_daeun_to_info,
    gongmang_for_day_pillar, gongmang_for_pillar_str, BranchRelation, DaeunDirection, EarthlyBranch, Element,
    Gender, HeavenlyStem, Pillar, RawDaeun, SajuPillars, YinYang,
};

fn raw(age: i32, stem: &str, branch: &str) -> RawDaeun {
    RawDaeun {
        start_age: age,
        stem: stem.to_string(),
        branch: branch.to_string(),
    }
}

#[test]
fn test_convert_daeun_elements() {
    let list = convert_saju_daeun_to_info(&[
        raw(3, "甲", "子"),
        raw(13, "丙", "午"),
        raw(23, "戊", "辰"),
        raw(33, "庚", "申"),
        raw(43, "壬", "子"),
    ]);
    let elements: Vec<&str> = list.iter().map(|d| d.element.korean()).collect();
    assert_eq!(elements, ["목", "화", "토", "금", "수"]);
    for d in &list {
        assert_eq!(d.end_age, d.start_age + 9);
        assert_eq!(d.yin_yang, YinYang::Yang);
    }
}

#[test]
fn test_convert_accepts_alternate_field_names() {
    let json = r#"[
        {"age": 17, "heavenlyStem": "辛", "earthlyBranch": "巳"},
        {"startAge": 7, "stem": "경", "branch": "진"},
        {"startAge": 27, "stem": "??", "branch": "午"}
    ]"#;
    let entries: Vec<RawDaeun> = serde_json::from_str(json).unwrap();
    let list = convert_saju_daeun_to_info(&entries);

    assert_eq!(list.len(), 2);
    assert_eq!(list[0].start_age, 7);
    assert_eq!(list[0].stem, HeavenlyStem::Gyeong);
    assert_eq!(list[0].branch, EarthlyBranch::Dragon);
    assert_eq!(list[1].element, Element::Metal);
    assert_eq!(list[1].yin_yang, YinYang::Yin);
}

#[test]
fn test_daeun_serializes_with_korean_element() {
    let list = convert_saju_daeun_to_info(&[raw(5, "丁", "卯")]);
    let value = serde_json::to_value(list[0]).unwrap();
    assert_eq!(value["startAge"], 5);
    assert_eq!(value["endAge"], 14);
    assert_eq!(value["stem"], "丁");
    assert_eq!(value["branch"], "卯");
    assert_eq!(value["element"], "화");
    assert_eq!(value["yinYang"], "음");
}

#[test]
fn test_sequence_direction_and_lookup() {
    let month: Pillar = "丙寅".parse().unwrap();
    // 庚 is a yang stem
    let forward = DaeunDirection::for_person(HeavenlyStem::Gyeong, Gender::Male);
    assert_eq!(forward, DaeunDirection::Forward);
    assert_eq!(DaeunDirection::for_person(HeavenlyStem::Gyeong, Gender::Female), DaeunDirection::Backward);

    let seq = build_daeun_sequence(month, forward, 4, 8);
    assert_eq!(seq.len(), 8);
    assert_eq!(seq[0].pillar().to_string(), "丁卯");
    assert_eq!(seq[1].pillar().to_string(), "戊辰");
    assert_eq!(seq[7].start_age, 74);

    let back = build_daeun_sequence(month, DaeunDirection::Backward, 4, 2);
    assert_eq!(back[0].pillar().to_string(), "乙丑");
    assert_eq!(back[1].pillar().to_string(), "甲子");

    assert_eq!(active_daeun(&seq, 13).map(|d| d.start_age), Some(4));
    assert_eq!(active_daeun(&seq, 14).map(|d| d.start_age), Some(14));
    assert!(active_daeun(&seq, 3).is_none());
}

#[test]
fn test_gongmang_groups() {
    // 甲子旬 leaves 戌亥 void
    let g = gongmang_for_day_pillar(HeavenlyStem::Gap, EarthlyBranch::Rat);
    assert_eq!(g.branches, [EarthlyBranch::Dog, EarthlyBranch::Pig]);
    assert!(!g.is_fallback);

    // 丙寅 belongs to 甲子旬 too; 丙子 to 甲戌旬 (申酉)
    assert_eq!(gongmang_for_pillar_str("丙寅").branches, [EarthlyBranch::Dog, EarthlyBranch::Pig]);
    let g = gongmang_for_pillar_str("병자");
    assert_eq!(g.branches, [EarthlyBranch::Monkey, EarthlyBranch::Rooster]);
    assert_eq!(g.xun_head.to_string(), "甲戌");

    // 癸亥 closes the cycle in 甲寅旬 (子丑)
    assert!(gongmang_for_pillar_str("癸亥").contains(EarthlyBranch::Rat));
}

#[test]
fn test_gongmang_fallback() {
    // Stem and branch of different polarity never pair
    let g = gongmang_for_day_pillar(HeavenlyStem::Gap, EarthlyBranch::Ox);
    assert!(g.is_fallback);
    assert_eq!(g.branches, [EarthlyBranch::Dog, EarthlyBranch::Pig]);
    assert!(gongmang_for_pillar_str("nonsense").is_fallback);
}

fn person(day: &str) -> SajuPillars {
    SajuPillars {
        year: "庚午".parse().unwrap(),
        month: "辛巳".parse().unwrap(),
        day: day.parse().unwrap(),
        time: None,
    }
}

#[test]
fn test_compatibility_ordering() {
    let harmonious = analyze_compatibility(&person("甲子"), &person("己丑"));
    assert!(harmonious.stem_combination);
    assert_eq!(harmonious.branch_relation, BranchRelation::SixHarmony);

    let clashing = analyze_compatibility(&person("甲子"), &person("庚午"));
    assert_eq!(clashing.branch_relation, BranchRelation::Clash);
    assert!(harmonious.score > clashing.score);
    assert!((0.0..=100.0).contains(&clashing.score));
    assert!(!clashing.notes.is_empty());
}

#[test]
fn test_compatibility_gongmang_hit() {
    // 甲子's void holds 戌; 丙戌 sits in it
    let report = analyze_compatibility(&person("甲子"), &person("丙戌"));
    assert!(report.gongmang_hits >= 1);
}

#[test]
fn test_convert_survives_out_of_range_ages() {
    let list = convert_saju_daeun_to_info(&[raw(i32::MAX, "甲", "子"), raw(i32::MIN, "丙", "午"), raw(3, "戊", "辰")]);
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].start_age, i32::MIN);
    assert_eq!(list[0].end_age, i32::MIN + 9);
    assert_eq!(list[2].start_age, i32::MAX);
    assert_eq!(list[2].end_age, i32::MAX);
    assert_eq!(active_daeun(&list, 5).map(|d| d.start_age), Some(3));
}

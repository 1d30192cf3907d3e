use std::collections::HashMap;

use cbeta_backend::analysis::{analyze_corpus, classify_records};
use cbeta_backend::grouping::{
    build_commentary_mapping, build_translation_groups, build_type_groups, known_source_titles,
    text_type_for_group_id, GroupIdCounters, UNKNOWN_GROUP_ID,
};
use cbeta_backend::title_patterns::TitleRules;
use cbeta_backend::types::{Classification, ClassifiedRecord, Record, TextType};

fn sample_records() -> Vec<Record> {
    vec![
        Record::new("T0235", "金刚般若波罗蜜经", "姚秦 鸠摩罗什译", "T"),
        Record::new("T0220", "大般若波罗蜜多经", "唐 玄奘译", "T"),
        Record::new("T1509", "大智度论", "龙树造", "T"),
        Record::new("T1698", "金刚般若波罗蜜经疏", "隋 智顗说", "T"),
        Record::new("X0001", "禅门", "", "X"),
        Record::new("T1699", "金刚般若波罗蜜经疏", "唐 吉藏撰", "T"),
        Record::new("T2059", "高僧传", "梁 慧皎撰", "T"),
    ]
}

fn jing(id: &str, title: &str, author: &str) -> ClassifiedRecord {
    ClassifiedRecord::new(
        Record::new(id, title, author, "T"),
        Classification {
            text_type: TextType::Jing,
            matched_suffix: "经".to_string(),
        },
    )
}

#[test]
fn test_every_record_in_exactly_one_group() {
    let rules = TitleRules::default();
    let records = sample_records();
    let analysis = analyze_corpus(records.clone(), &rules);

    let grouping = &analysis.type_grouping;
    assert_eq!(grouping.assignments.len(), records.len());

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for group in grouping.groups.iter() {
        for id in group.member_ids.iter() {
            *seen.entry(id.as_str()).or_default() += 1;
        }
    }
    for r in records.iter() {
        assert_eq!(seen.get(r.id.as_str()), Some(&1), "record {}", r.id);
        assert!(grouping.assignments.contains_key(&r.id), "record {}", r.id);
    }

    // The table keeps input order.
    let ids: Vec<&String> = grouping.assignments.keys().collect();
    let expected: Vec<&String> = records.iter().map(|r| &r.id).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_group_ids_by_type_multi_version_first() {
    let rules = TitleRules::default();
    let analysis = analyze_corpus(sample_records(), &rules);
    let a = &analysis.type_grouping.assignments;

    assert_eq!(a["T0235"].group_id, 1000);
    assert_eq!(a["T0235"].group_name, "金刚般若波罗蜜经");
    assert_eq!(a["T0220"].group_id, 1001);
    assert_eq!(a["T1509"].group_id, 2000);
    assert_eq!(a["T1509"].text_type, TextType::Lun);

    // Two commentaries with one key share a group named by the key.
    assert_eq!(a["T1698"].group_id, 3000);
    assert_eq!(a["T1699"].group_id, 3000);
    assert_eq!(a["T1699"].group_name, "金刚般若波罗蜜经疏");
    assert_eq!(a["T2059"].group_id, 3001);
    assert_eq!(a["T2059"].group_name, "高僧传");

    for (id, row) in a.iter() {
        assert_eq!(text_type_for_group_id(row.group_id), row.text_type, "record {}", id);
    }
}

#[test]
fn test_multi_version_groups_numbered_before_singletons() {
    let rules = TitleRules::default();
    let records = vec![
        Record::new("T0366", "阿弥陀经", "", ""),
        Record::new("T0262", "法华经", "", ""),
        Record::new("T0264", "法华经", "", ""),
        Record::new("T0360", "无量寿经", "", ""),
        Record::new("T1509", "大智度论", "", ""),
        Record::new("T1564", "中论", "", ""),
        Record::new("T1565", "中论", "", ""),
    ];
    let analysis = analyze_corpus(records, &rules);
    let a = &analysis.type_grouping.assignments;

    assert_eq!(a["T0262"].group_id, 1000);
    assert_eq!(a["T0264"].group_id, 1000);
    assert_eq!(a["T0262"].group_name, "法华经");
    // Singletons follow in record order.
    assert_eq!(a["T0366"].group_id, 1001);
    assert_eq!(a["T0360"].group_id, 1002);

    assert_eq!(a["T1564"].group_id, 2000);
    assert_eq!(a["T1565"].group_id, 2000);
    assert_eq!(a["T1509"].group_id, 2001);
}

#[test]
fn test_unknown_records_get_group_zero() {
    let rules = TitleRules::default();
    let analysis = analyze_corpus(sample_records(), &rules);
    let row = &analysis.type_grouping.assignments["X0001"];

    assert_eq!(row.text_type, TextType::Unknown);
    assert_eq!(row.group_id, UNKNOWN_GROUP_ID);
    assert_eq!(row.group_name, "");
}

#[test]
fn test_unknown_records_are_never_merged() {
    let rules = TitleRules::default();
    let records = classify_records(
        vec![
            Record::new("X1", "禅门", "", ""),
            Record::new("X2", "禅门", "", ""),
        ],
        &rules,
    );
    let (grouping, counters) = build_type_groups(&records, &rules, GroupIdCounters::new());

    assert_eq!(grouping.groups.len(), 2);
    assert!(grouping.groups.iter().all(|g| g.group_id == 0 && g.version_count() == 1));
    assert_eq!(counters, GroupIdCounters::new());
}

#[test]
fn test_counters_are_threaded_through() {
    let rules = TitleRules::default();
    let records = classify_records(sample_records(), &rules);

    let (_, counters) = build_type_groups(&records, &rules, GroupIdCounters::new());
    assert_eq!(counters.jing, 1002);
    assert_eq!(counters.lun, 2001);
    assert_eq!(counters.zhushu, 3002);
    assert_eq!(counters.other, 4000);

    let (second, _) = build_type_groups(&records, &rules, counters);
    assert_eq!(second.assignments["T0235"].group_id, 1002);
}

#[test]
fn test_commentary_mapped_to_source() {
    let rules = TitleRules::default();
    let analysis = analyze_corpus(sample_records(), &rules);
    let mapping = &analysis.commentary_mapping;

    assert_eq!(mapping.len(), 1);
    let source = &mapping["T0235"];
    assert_eq!(source.title, "金刚般若波罗蜜经");
    assert_eq!(source.source_type, TextType::Jing);

    let ids: Vec<&str> = source.zhushus.iter().map(|z| z.id.as_str()).collect();
    assert_eq!(ids, vec!["T1698", "T1699"]);
    assert_eq!(source.zhushus[0].suffix, "疏");

    // 高僧传 has no recoverable source and stays out of the mapping.
    assert_eq!(analysis.summary.total_zhushu, 3);
    assert_eq!(analysis.summary.matched_zhushu, 2);
    assert_eq!(analysis.summary.sources_with_zhushu, 1);
}

#[test]
fn test_repeated_source_title_last_record_wins() {
    let rules = TitleRules::default();
    let records = classify_records(
        vec![
            Record::new("T0235", "金刚般若波罗蜜经", "姚秦 鸠摩罗什译", ""),
            Record::new("T1509", "大智度论", "", ""),
            Record::new("T0236", "金刚般若波罗蜜经", "元魏 菩提流支译", ""),
            Record::new("T1698", "金刚般若波罗蜜经疏", "", ""),
        ],
        &rules,
    );

    let known = known_source_titles(&records);
    assert_eq!(known.get_index_of("金刚般若波罗蜜经"), Some(0));
    assert_eq!(known["金刚般若波罗蜜经"].id(), "T0236");
    assert_eq!(known.get_index_of("大智度论"), Some(1));

    let mapping = build_commentary_mapping(&records, &rules);
    assert!(mapping.contains_key("T0236"));
    assert!(!mapping.contains_key("T0235"));
}

#[test]
fn test_commentary_on_treatise() {
    let rules = TitleRules::default();
    let records = classify_records(
        vec![
            Record::new("T1585", "成唯识论", "唐 玄奘译", ""),
            Record::new("T1830", "成唯识论述记", "唐 窥基撰", ""),
        ],
        &rules,
    );
    let mapping = build_commentary_mapping(&records, &rules);

    assert_eq!(mapping["T1585"].source_type, TextType::Lun);
    assert_eq!(mapping["T1585"].zhushus[0].suffix, "述记");
}

#[test]
fn test_translation_group() {
    let rules = TitleRules::default();
    let records = vec![
        jing("T0237", "金刚般若波罗蜜经(宋施护译)", "宋 施护译"),
        jing("T0366", "佛说阿弥陀经", "姚秦 鸠摩罗什译"),
        jing("T0220", "金刚般若波罗蜜经(唐玄奘译)", "唐 玄奘译"),
    ];
    let groups = build_translation_groups(&records, &rules);

    assert_eq!(groups.len(), 1);
    let g = &groups["金刚般若波罗蜜经"];
    assert_eq!(g.base_title, "金刚般若波罗蜜经");
    assert_eq!(g.total_versions, 2);
    let ids: Vec<&str> = g.translations.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["T0220", "T0237"]);
}

#[test]
fn test_translation_groups_only_cover_jing() {
    let rules = TitleRules::default();
    let records = classify_records(
        vec![
            Record::new("T0366", "佛说阿弥陀经", "姚秦 鸠摩罗什译", ""),
            Record::new("T0367", "阿弥陀经", "唐 玄奘译", ""),
            Record::new("T1509", "大智度论", "", ""),
            Record::new("T1510", "大智度论", "", ""),
        ],
        &rules,
    );
    let groups = build_translation_groups(&records, &rules);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups["阿弥陀经"].total_versions, 2);
}

#[test]
fn test_summary_stats() {
    let rules = TitleRules::default();
    let analysis = analyze_corpus(sample_records(), &rules);
    let summary = &analysis.summary;

    assert_eq!(summary.total_records, 7);

    let zhushu = summary.stats_for(TextType::Zhushu).unwrap();
    assert_eq!(zhushu.total, 3);
    assert_eq!(zhushu.multi_version_groups, 1);
    assert_eq!(zhushu.multi_version_records, 2);
    assert_eq!(zhushu.single_version_records, 1);

    let unknown = summary.stats_for(TextType::Unknown).unwrap();
    assert_eq!(unknown.total, 1);
    assert_eq!(unknown.multi_version_groups, 0);

    let multi = analysis.multi_version_groups(TextType::Zhushu);
    assert_eq!(multi.len(), 1);
    assert_eq!(multi[0].group_name, "金刚般若波罗蜜经疏");
}

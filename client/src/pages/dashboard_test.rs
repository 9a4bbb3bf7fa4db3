use super::*;

#[test]
fn admin_cards_link_to_admin_routes() {
    let cards = cards_for(Role::Admin, DashboardStats::default());
    assert_eq!(cards.len(), 4);
    for card in cards {
        assert!(card.link.access().admits(Role::Admin), "{}", card.title);
    }
}

#[test]
fn teacher_cards_link_to_teacher_routes() {
    for card in cards_for(Role::Teacher, DashboardStats::default()) {
        assert!(card.link.access().admits(Role::Teacher), "{}", card.title);
    }
}

#[test]
fn cards_carry_loaded_counts() {
    let stats = DashboardStats { courses: Some(3), students: Some(40), subjects: Some(5), assignments: None };
    let cards = cards_for(Role::Admin, stats);
    assert_eq!(cards[0].value, Some(3));
    assert_eq!(cards[1].value, Some(40));
    assert_eq!(cards[3].value, None);
}

#[test]
fn quick_actions_respect_role_access() {
    for role in Role::ALL {
        for (route, _) in quick_actions(role) {
            assert!(route.access().admits(role), "{route:?}");
        }
    }
}

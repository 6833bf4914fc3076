//! Built-in modules shipped with the shell.

use crate::component::{ModuleComponent, ModuleExports, ModuleView, ViewSection};
use crate::error::FactoryError;
use crate::registry::{ModuleDescriptor, ModuleRegistry};
use sailor_domain::constants::{
    ADMIN, BOATS, DASHBOARD, EQUIPMENT, EVENTS, MAINTENANCE, NAVIGATION, SOCIAL, TRIPS,
};
use sailor_domain::identity::UserIdentity;
use sailor_domain::module::ModuleMeta;
use std::sync::Arc;

const UNDER_DEVELOPMENT: &str = "🚧 Under Development";

#[derive(Debug)]
struct Dashboard;

impl ModuleComponent for Dashboard {
    fn render(&self, user: &UserIdentity) -> ModuleView {
        ModuleView::new("Dashboard")
            .subtitle(format!("Welcome back, {}!", user.display_name()))
            .section(ViewSection::new("Recent Activity", ["No recent activity to display."]))
            .section(ViewSection::new(
                "Quick Stats",
                ["Boats: 0", "Trips: 0", "Equipment: 0", "Events: 0"],
            ))
            .section(ViewSection::new("Upcoming Events", ["No upcoming events scheduled."]))
            .section(ViewSection::new("Maintenance Reminders", ["No maintenance items due."]))
    }
}

#[derive(Debug)]
struct Admin;

impl ModuleComponent for Admin {
    fn render(&self, user: &UserIdentity) -> ModuleView {
        if !user.is_admin {
            return ModuleView::new("🔒 Access Denied").section(ViewSection::new(
                "Access Denied",
                ["You do not have administrator privileges to access this module."],
            ));
        }
        placeholder(
            "Admin Panel",
            "System administration and user management",
            "admin",
            &[
                "User management and permissions",
                "Module configuration",
                "System monitoring",
                "Data management and backups",
                "Security settings",
            ],
        )
    }
}

/// A module that is announced but not built yet.
#[derive(Debug)]
struct Planned {
    name: &'static str,
    title: &'static str,
    icon: &'static str,
    description: &'static str,
    subtitle: &'static str,
    features: &'static [&'static str],
}

impl ModuleComponent for &'static Planned {
    fn render(&self, _user: &UserIdentity) -> ModuleView {
        placeholder(self.title, self.subtitle, self.name, self.features)
    }
}

impl Planned {
    fn descriptor(&'static self) -> ModuleDescriptor {
        let meta = ModuleMeta::new(self.name, self.title)
            .icon(self.icon)
            .description(self.description);
        ModuleDescriptor::new(meta, move || async move {
            Ok::<_, FactoryError>(ModuleExports::component(self))
        })
    }
}

static PLANNED: [Planned; 7] = [
    Planned {
        name: BOATS,
        title: "Fleet Management",
        icon: "boat",
        description: "Manage your boats and fleet information",
        subtitle: "Manage your boats and fleet information",
        features: &[
            "Boat registration and details",
            "Fleet management",
            "Boat documentation",
            "Crew assignments",
        ],
    },
    Planned {
        name: TRIPS,
        title: "Trip Logbook",
        icon: "map",
        description: "Log and track your sailing trips with GPS support",
        subtitle: "Log and track your sailing trips with GPS support",
        features: &[
            "Trip logging and details",
            "GPS track upload and visualization",
            "Route planning",
            "Weather tracking",
            "Crew management",
        ],
    },
    Planned {
        name: EQUIPMENT,
        title: "Equipment Tracker",
        icon: "tools",
        description: "Manage your sailing equipment and inventory",
        subtitle: "Manage your sailing equipment and inventory",
        features: &[
            "Equipment catalog and inventory",
            "Condition tracking",
            "Warranty management",
            "Maintenance scheduling",
            "Location tracking",
        ],
    },
    Planned {
        name: MAINTENANCE,
        title: "Maintenance Log",
        icon: "wrench",
        description: "Track maintenance records and schedules",
        subtitle: "Track and schedule boat maintenance",
        features: &[
            "Service history",
            "Scheduled maintenance",
            "Cost tracking",
            "Parts and suppliers",
        ],
    },
    Planned {
        name: EVENTS,
        title: "Events Calendar",
        icon: "calendar",
        description: "Manage sailing events, races, and gatherings",
        subtitle: "Manage sailing events, races, and gatherings",
        features: &[
            "Event creation and management",
            "Registration handling",
            "Calendar integration",
            "Participant tracking",
            "Event results and reports",
        ],
    },
    Planned {
        name: NAVIGATION,
        title: "Weather & Routes",
        icon: "compass",
        description: "Weather information and route planning tools",
        subtitle: "Weather information and route planning tools",
        features: &[
            "Weather forecasts and conditions",
            "Route planning and optimization",
            "Chart integration",
            "Tide and current information",
            "Navigation tools",
        ],
    },
    Planned {
        name: SOCIAL,
        title: "Crew Network",
        icon: "users",
        description: "Connect with other sailors and crew members",
        subtitle: "Connect with other sailors and crew members",
        features: &[
            "Sailor profiles and networking",
            "Crew matching and recruitment",
            "Messaging and communication",
            "Experience sharing",
            "Community features",
        ],
    },
];

fn placeholder(title: &str, subtitle: &str, topic: &str, planned: &[&str]) -> ModuleView {
    let mut lines = vec![
        format!("The {topic} module is currently being developed."),
        "This will include features for:".to_owned(),
    ];
    lines.extend(planned.iter().map(|feature| format!("- {feature}")));
    ModuleView::new(title).subtitle(subtitle).section(ViewSection::new(UNDER_DEVELOPMENT, lines))
}

impl ModuleRegistry {
    /// The nine modules of the shell, in declaration order. Only `admin` is
    /// admin-only; every module requires a signed-in user.
    pub fn builtin() -> Self {
        let dashboard = ModuleDescriptor::new(
            ModuleMeta::new(DASHBOARD, "Dashboard")
                .icon("dashboard")
                .description("Main dashboard with overview and statistics"),
            || async { Ok::<_, FactoryError>(ModuleExports::component(Dashboard)) },
        );
        let admin = ModuleDescriptor::new(
            ModuleMeta::new(ADMIN, "Admin Panel")
                .icon("settings")
                .description("System administration and user management")
                .admin_only(),
            || async { Ok::<_, FactoryError>(ModuleExports::component(Admin)) },
        );

        let descriptors = std::iter::once(dashboard)
            .chain(PLANNED.iter().map(Planned::descriptor))
            .chain(std::iter::once(admin))
            .map(Arc::new)
            .collect();
        Self::from_descriptors(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_declares_nine_unique_modules() {
        let registry = ModuleRegistry::builtin();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            [
                DASHBOARD,
                BOATS,
                TRIPS,
                EQUIPMENT,
                MAINTENANCE,
                EVENTS,
                NAVIGATION,
                SOCIAL,
                ADMIN
            ]
        );

        let rebuilt = registry
            .list()
            .iter()
            .fold(ModuleRegistry::builder(), |builder, descriptor| {
                builder.descriptor(ModuleDescriptor::clone(descriptor))
            })
            .build();
        assert!(rebuilt.is_ok(), "builtin names must pass builder validation");

        let admin = registry.get(ADMIN).unwrap();
        assert!(admin.is_admin_only());
        assert!(registry.list().iter().all(|descriptor| descriptor.requires_auth()));
        assert_eq!(registry.list().iter().filter(|d| d.is_admin_only()).count(), 1);
        assert_eq!(registry.get(BOATS).unwrap().path, "/boats");
    }

    #[tokio::test]
    async fn test_dashboard_greets_by_first_name() {
        let registry = ModuleRegistry::builtin();
        let exports = registry.get(DASHBOARD).unwrap().factory().produce().await.unwrap();
        let component = exports.component.unwrap();

        let ada = UserIdentity::new("skipper").with_first_name("Ada");
        assert_eq!(component.render(&ada).subtitle.as_deref(), Some("Welcome back, Ada!"));

        let anon = UserIdentity::new("skipper");
        assert_eq!(component.render(&anon).subtitle.as_deref(), Some("Welcome back, skipper!"));
    }

    #[tokio::test]
    async fn test_admin_view_denies_non_admins() {
        let registry = ModuleRegistry::builtin();
        let exports = registry.get(ADMIN).unwrap().factory().produce().await.unwrap();
        let component = exports.component.unwrap();

        let crew = component.render(&UserIdentity::new("deckhand"));
        assert_eq!(crew.title, "🔒 Access Denied");

        let captain = component.render(&UserIdentity::new("captain").with_admin(true));
        assert_eq!(captain.title, "Admin Panel");
        assert_eq!(captain.sections[0].heading, UNDER_DEVELOPMENT);
    }

    #[tokio::test]
    async fn test_placeholders_list_planned_features() {
        let registry = ModuleRegistry::builtin();
        let factory = registry.get(TRIPS).unwrap().factory();
        let component = factory.produce().await.unwrap().component.unwrap();

        let view = component.render(&UserIdentity::new("skipper"));
        assert_eq!(view.title, "Trip Logbook");
        assert!(view.sections[0].lines.iter().any(|line| line == "- Route planning"));
    }
}

// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Decides whether a view may render for the current session.

use crate::{
    model::{Identity, Role},
    route::{Route, MENU},
    session::SessionState,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    Render,
    /// The session has a credential whose owner is not known yet.
    Loading,
    RedirectLogin,
    /// Signed in, but not allowed here.
    RedirectHome,
}

pub(crate) fn permits(identity: &Identity, requirement: &[Role]) -> bool {
    requirement.is_empty() || requirement.contains(&identity.rol)
}

pub(crate) fn evaluate(state: &SessionState, requirement: &[Role]) -> Decision {
    match *state {
        SessionState::Resolving(_) => Decision::Loading,
        SessionState::Anonymous => Decision::RedirectLogin,
        SessionState::Authenticated { ref identity, .. } if !permits(identity, requirement) => {
            Decision::RedirectHome
        }
        SessionState::Authenticated { .. } => Decision::Render,
    }
}

/// The menu entries visible to the given identity.
pub(crate) fn menu(identity: &Identity) -> impl Iterator<Item = (&'static str, Route)> + '_ {
    MENU.iter().copied().filter(move |&(_, route)| {
        route
            .requirement()
            .map_or(true, |requirement| permits(identity, requirement))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::User, session::Credential};

    fn identity(rol: Role) -> Identity {
        User {
            id: 1,
            nombre: "Ana".to_owned(),
            email: "a@b.com".to_owned(),
            rol,
            estado: true,
        }
    }

    fn signed_in(rol: Role) -> SessionState {
        SessionState::Authenticated {
            credential: Credential::new("t1"),
            identity: identity(rol),
        }
    }

    #[test]
    fn renders_iff_role_is_required_or_nothing_is() {
        for route in Route::ALL {
            let Some(requirement) = route.requirement() else {
                continue;
            };
            for rol in [Role::Manager, Role::Operator] {
                let expected = if requirement.is_empty() || requirement.contains(&rol) {
                    Decision::Render
                } else {
                    Decision::RedirectHome
                };
                assert_eq!(evaluate(&signed_in(rol), requirement), expected, "{route} as {rol}");
            }
        }
    }

    #[test]
    fn anonymous_is_sent_to_login_everywhere() {
        for route in Route::ALL {
            if let Some(requirement) = route.requirement() {
                assert_eq!(
                    evaluate(&SessionState::Anonymous, requirement),
                    Decision::RedirectLogin
                );
            }
        }
    }

    #[test]
    fn unresolved_credential_waits() {
        let state = SessionState::Resolving(Credential::new("t1"));
        assert_eq!(evaluate(&state, &[]), Decision::Loading);
        assert_eq!(evaluate(&state, &[Role::Manager]), Decision::Loading);
    }

    #[test]
    fn operators_are_bounced_from_clients() {
        let requirement = Route::Clientes.requirement().unwrap_or_default();
        assert_eq!(
            evaluate(&signed_in(Role::Operator), requirement),
            Decision::RedirectHome
        );
    }

    #[test]
    fn operator_menu_hides_manager_sections() {
        let operator = identity(Role::Operator);
        let labels: Vec<_> = menu(&operator).map(|(label, _)| label).collect();
        assert_eq!(labels, ["Dashboard", "Sierras", "Historial"]);

        let manager = identity(Role::Manager);
        assert_eq!(menu(&manager).count(), MENU.len());
    }
}

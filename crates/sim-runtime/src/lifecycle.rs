//! Research projects and marketing campaigns over time.

use chrono::NaiveDate;
use sim_core::{ActiveCampaign, ActiveResearch, MarketingCampaign, Player, ResearchProject};
use tracing::{debug, info};

/// Why a project cannot be started right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResearchBlock {
    Busy,
    AlreadyCompleted,
    MissingPrerequisite,
}

/// Check everything except funds.
pub fn research_block(player: &Player, project: &ResearchProject) -> Option<ResearchBlock> {
    if player.active_research.is_some() {
        return Some(ResearchBlock::Busy);
    }
    if player.has_completed(&project.id) {
        return Some(ResearchBlock::AlreadyCompleted);
    }
    if !project.prerequisites.iter().all(|p| player.has_completed(p)) {
        return Some(ResearchBlock::MissingPrerequisite);
    }
    None
}

/// Pay for and start `project`. Eligibility is the caller's concern.
pub fn start_research(player: &mut Player, project: &ResearchProject, today: NaiveDate) {
    player.cash -= project.cost;
    player.active_research = Some(ActiveResearch {
        project: project.clone(),
        start: today,
    });
    info!(project = %project.id, cost = %project.cost, "research started");
}

/// Finish the active project if its time is up, applying its effects once.
pub fn complete_research(player: &mut Player, today: NaiveDate) -> Option<ResearchProject> {
    if !player.active_research.as_ref()?.is_complete(today) {
        return None;
    }
    let project = player.active_research.take()?.project;
    let fx = &project.effects;
    let mods = &mut player.research_modifiers;
    if let Some(m) = fx.fuel_efficiency_modifier {
        mods.fuel_efficiency *= m;
    }
    if let Some(m) = fx.maintenance_modifier {
        mods.maintenance *= m;
    }
    if let Some(m) = fx.base_demand_modifier {
        mods.base_demand *= m;
    }
    if let Some(d) = fx.satisfaction {
        player.adjust_satisfaction(d);
    }
    if let Some(d) = fx.service_quality {
        player.set_service_quality(player.service_quality() + d);
    }
    if let Some(cash) = fx.cash {
        player.cash += cash;
    }
    player.completed_research.push(project.id.clone());
    info!(project = %project.id, "research completed");
    Some(project)
}

/// Pay for a campaign, apply its brand bump and start it today.
pub fn launch_campaign(player: &mut Player, campaign: &MarketingCampaign, today: NaiveDate) {
    player.cash -= campaign.cost;
    if let Some(bump) = campaign.effects.brand_awareness {
        player.set_brand_awareness(player.brand_awareness() + bump);
    }
    player
        .active_campaigns
        .push(ActiveCampaign::launch(campaign.clone(), today));
    info!(campaign = %campaign.id, cost = %campaign.cost, "campaign launched");
}

/// Drop campaigns that have run their course; returns how many ended.
pub fn expire_campaigns(player: &mut Player, today: NaiveDate) -> usize {
    let before = player.active_campaigns.len();
    player.active_campaigns.retain(|c| c.is_running(today));
    let ended = before - player.active_campaigns.len();
    if ended > 0 {
        debug!(ended, "campaigns ended");
    }
    ended
}

use yeti_scene::SceneConfig;

fn main() -> anyhow::Result<()> {
    yeti_scene::run(SceneConfig::default())
}

use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Connects two nodes in series: the source renders into the block, then the
effect transforms that same block in place.

    [Source] ──► [Effect] ──► out

Chains nest, so a longer path is just more `through` calls:

    saw.through(bp1).through(bp2).through(bp3)     formant cascade
    input.through(crusher).through(reverb)         effect rack

No extra buffer is needed; every stage works on the caller's block.
*/

pub struct Through<S, F> {
    source: S,
    effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn effect(&self) -> &F {
        &self.effect
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.effect.render_block(out, ctx);
    }
}
